// Copyright 2018 The GeoRust Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Error raised while loading, decoding or projecting a map
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    BboxExpectedArray,
    BboxExpectedNumericValues,
    TopologyExpectedObjects,
    TopologyExpectedArcs,
    TopologyHasNoObjects,
    TransformExpectedScale,
    TransformExpectedTranslate,
    ScaleExpectedArray,
    ScaleExpectedNumericValues,
    TranslateExpectedArray,
    TranslateExpectedNumericValues,
    TopoJsonUnknownType,
    GeometryUnknownType,
    MalformedJson,
    PropertiesExpectedObjectOrNull,
    ExpectedType { expected: String, actual: String },
    ExpectedTopology,
    TopoToGeoUnknownKey(String),
    ArcIndexOutOfRange(i32),
    ExpectedStringValue,
    ExpectedProperty(String),
    Expectedi32Value,
    ExpectedF64Value,
    ExpectedArrayValue,
    ExpectedObjectValue,
    Fetch { location: String, reason: String },
    InvalidColor(String),
    DegenerateExtent,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::BboxExpectedArray => {
                write!(f, "Encountered non-array type for a 'bbox' object.")
            }
            Error::BboxExpectedNumericValues => {
                write!(f, "Encountered non-numeric value within 'bbox' array.")
            }
            Error::TopologyExpectedObjects => {
                write!(f, "Expected member with the name 'objects' in Topology.")
            }
            Error::TopologyExpectedArcs => {
                write!(f, "Expected member with the name 'arcs' in Topology.")
            }
            Error::TopologyHasNoObjects => {
                write!(f, "Topology does not contain any named object.")
            }
            Error::TransformExpectedScale => {
                write!(f, "Transform must have a member with the name 'scale'.")
            }
            Error::TransformExpectedTranslate => {
                write!(f, "Transform must have a member with the name 'translate'.")
            }
            Error::ScaleExpectedArray => {
                write!(f, "Encountered non-array type for a 'scale' object.")
            }
            Error::ScaleExpectedNumericValues => {
                write!(f, "Encountered non-numeric value within 'scale' array.")
            }
            Error::TranslateExpectedArray => {
                write!(f, "Encountered non-array type for a 'translate' object.")
            }
            Error::TranslateExpectedNumericValues => {
                write!(f, "Encountered non-numeric value within 'translate' array.")
            }
            Error::TopoJsonUnknownType => write!(f, "Encountered unknown TopoJSON object type."),
            Error::GeometryUnknownType => write!(f, "Encountered unknown 'geometry' object type."),
            Error::MalformedJson => write!(f, "Encountered malformed JSON."),
            Error::PropertiesExpectedObjectOrNull => write!(
                f,
                "Encountered neither object type nor null type for \
                 'properties' object."
            ),
            Error::ExpectedType {
                ref expected,
                ref actual,
            } => write!(
                f,
                "Expected TopoJSON type '{}', found '{}'",
                expected, actual,
            ),
            Error::ExpectedTopology => write!(f, "Expected a TopoJSON Topology object."),
            Error::TopoToGeoUnknownKey(ref key) => {
                write!(f, "No object with key '{}' in the given Topology.", key)
            }
            Error::ArcIndexOutOfRange(ix) => {
                write!(f, "Arc index {} is out of range for this Topology.", ix)
            }
            Error::ExpectedStringValue => write!(f, "Expected a string value."),
            Error::ExpectedProperty(ref prop_name) => {
                write!(f, "Expected TopoJSON property '{}'.", prop_name)
            }
            Error::ExpectedF64Value => write!(f, "Expected a floating-point value."),
            Error::Expectedi32Value => write!(f, "Expected a positive integer."),
            Error::ExpectedArrayValue => write!(f, "Expected an array."),
            Error::ExpectedObjectValue => write!(f, "Expected an object."),
            Error::Fetch {
                ref location,
                ref reason,
            } => write!(f, "Unable to fetch '{}': {}", location, reason),
            Error::InvalidColor(ref color) => write!(f, "Unable to parse color '{}'.", color),
            Error::DegenerateExtent => {
                write!(f, "Geometry has no projectable extent to fit.")
            }
        }
    }
}

impl std::error::Error for Error {}
