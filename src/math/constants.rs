/* Copyright 2020 @Yuchen Wong */

use nalgebra as na;

pub type Float = f32;
pub type Int = i32;
pub type UInt = u32;

pub type Vector2f = na::Vector2<Float>;
pub type Vector3f = na::Vector3<Float>;
pub type Vector3d = na::Vector3<f64>;
pub type Vector4f = na::Vector4<Float>;
pub type Vector2i = na::Vector2<Int>;
pub type Matrix3f = na::Matrix3<Float>;
pub type Matrix4f = na::Matrix4<Float>;

pub const EPSILON: Float = 1e-4;
// Relative slack used to push ray origins off surfaces and bounds.
pub const RAY_EPSILON: Float = 1e-5;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;
pub const SQUARE_2: Float = 1.41421356;
pub const INV_SQUARE_2: Float = 0.70710678;

pub const FLOAT_MAX: Float = std::f32::MAX;
pub const FLOAT_MIN: Float = std::f32::MIN;
