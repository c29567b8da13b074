// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! RhinoCommon JSON shapes used on the compute wire

use crate::geometry::{Archive, BoundingBox};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// `Point3d` / `Vector3d`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Point3<f64>> for Xyz {
    fn from(p: Point3<f64>) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Vector3<f64>> for Xyz {
    fn from(v: Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Xyz> for Point3<f64> {
    fn from(p: Xyz) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

/// `BoundingBox`; extra properties such as `IsValid` are ignored on input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RhinoBox {
    pub min: Xyz,
    pub max: Xyz,
}

impl From<&BoundingBox> for RhinoBox {
    fn from(b: &BoundingBox) -> Self {
        Self {
            min: b.min.into(),
            max: b.max.into(),
        }
    }
}

impl From<RhinoBox> for BoundingBox {
    fn from(b: RhinoBox) -> Self {
        BoundingBox::new(b.min.into(), b.max.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Plane {
    pub origin: Xyz,
    pub x_axis: Xyz,
    pub y_axis: Xyz,
    pub z_axis: Xyz,
}

impl Plane {
    /// Right-handed plane at `origin` whose normal is `normal`
    pub fn with_normal(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        let z = normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
        let helper = if z.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let x = (helper - z * helper.dot(&z)).normalize();
        let y = z.cross(&x);
        Self {
            origin: origin.into(),
            x_axis: x.into(),
            y_axis: y.into(),
            z_axis: z.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sphere {
    pub center: Xyz,
    pub radius: f64,
}

/// `Cylinder` spanning `Height1..Height2` along the base plane normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cylinder {
    pub base_plane: Plane,
    pub radius: f64,
    pub height1: f64,
    pub height2: f64,
}

/// `Transform` as its sixteen named entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(
    #[serde(with = "transform_entries")] pub Matrix4<f64>,
);

mod transform_entries {
    use nalgebra::Matrix4;
    use serde::de::Error;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(m: &Matrix4<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(16))?;
        for row in 0..4 {
            for col in 0..4 {
                map.serialize_entry(&format!("M{}{}", row, col), &m[(row, col)])?;
            }
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Matrix4<f64>, D::Error> {
        let entries = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut m = Matrix4::zeros();
        for row in 0..4 {
            for col in 0..4 {
                let key = format!("M{}{}", row, col);
                m[(row, col)] = entries
                    .get(&key)
                    .and_then(serde_json::Value::as_f64)
                    .ok_or_else(|| D::Error::custom(format!("missing {}", key)))?;
            }
        }
        Ok(m)
    }
}

/// `GeometryBase.Transform` comes back as `[bool, geometry]`; some servers
/// return the geometry alone
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TransformReply {
    Modified(bool, Archive),
    Plain(Archive),
}

impl TransformReply {
    pub fn into_archive(self) -> Option<Archive> {
        match self {
            Self::Modified(true, archive) | Self::Plain(archive) => Some(archive),
            Self::Modified(false, _) => None,
        }
    }
}
