// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::core::bsdf::BSDF;
use crate::core::computation_node::ComputationNode;
use crate::core::film::{Film, ReconstructionFilter};
use crate::core::integrator::Integrator;
use crate::core::scene::{Scene, SceneObject};
use crate::core::scene_node::SceneNode;
use crate::core::shape::Shape;
use crate::emitters::directional::DirectionalEmitter;
use crate::integrators::path::{PathIntegrator, DEFAULT_MAX_DEPTH};
use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
use crate::math::constants::{Float, Matrix4f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::transform::Transform;
use crate::sensors::distant::{DistantSensorBuilder, SensorError};
use crate::shapes::disk::Disk;
use crate::shapes::rectangle::Rectangle;

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene: {0}")]
    Parse(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("unsupported {tag} type '{plugin_type}'")]
    Unsupported { tag: String, plugin_type: String },
    #[error("invalid sensor: {0}")]
    Sensor(#[from] SensorError),
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneLoadError> {
    let result = load_scene_with_settings(path)?;
    Ok(result.scene)
}

pub struct SceneLoadResult {
    pub scene: Scene,
    pub integrator: Option<Box<dyn Integrator>>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
}

pub fn load_scene_with_settings<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let xml = fs::read_to_string(path.as_ref())?;
    parse_scene(&xml)
}

pub fn parse_scene(xml: &str) -> Result<SceneLoadResult, SceneLoadError> {
    let root = parse_tree(xml)?;
    if root.tag != "scene" {
        return Err(SceneLoadError::Parse(format!("expected <scene> root, got <{}>", root.tag)));
    }

    let mut loader = SceneInterpreter::default();
    loader.load_root(&root)?;
    loader.finish()
}

struct XmlElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(e: &BytesStart) -> Result<Self, SceneLoadError> {
        let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| SceneLoadError::Parse(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()
                .map_err(|err| SceneLoadError::Parse(err.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self { tag, attributes, children: Vec::new() })
    }

    fn raw_attr(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn name(&self) -> Option<&str> {
        self.raw_attr("name")
    }
}

fn attach(stack: &mut Vec<XmlElement>,
          root: &mut Option<XmlElement>,
          element: XmlElement) -> Result<(), SceneLoadError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(SceneLoadError::Parse("multiple root elements".to_string()));
    }
    Ok(())
}

fn parse_tree(xml: &str) -> Result<XmlElement, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(XmlElement::from_start(&e)?),
            Ok(Event::Empty(e)) => {
                let element = XmlElement::from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop()
                    .ok_or_else(|| SceneLoadError::Parse("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SceneLoadError::Parse(
                    format!("error at position {}: {}", reader.buffer_position(), e)));
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SceneLoadError::Parse(format!("unclosed element <{}>", open.tag)));
    }
    root.ok_or_else(|| SceneLoadError::Parse("empty document".to_string()))
}

#[derive(Default)]
struct SceneInterpreter {
    defaults: HashMap<String, String>,
    bsdfs: HashMap<String, Arc<dyn BSDF>>,
    bsdf_types: HashMap<String, String>,
    shapes: HashMap<String, Arc<dyn Shape>>,
    sensors: Vec<DistantSensorBuilder>,
    scene: Scene,
    has_integrator: bool,
    samples_per_pixel: Option<u32>,
    max_depth: Option<u32>,
}

impl SceneInterpreter {
    fn load_root(&mut self, root: &XmlElement) -> Result<(), SceneLoadError> {
        for child in &root.children {
            match child.tag.as_str() {
                "default" => {
                    let name = child.raw_attr("name").ok_or(SceneLoadError::MissingField("default.name"))?;
                    let value = child.raw_attr("value").ok_or(SceneLoadError::MissingField("default.value"))?;
                    self.defaults.insert(name.to_string(), value.to_string());
                }
                "integrator" => self.load_integrator(child)?,
                "sensor" => {
                    let builder = self.load_sensor(child)?;
                    self.sensors.push(builder);
                }
                "bsdf" => {
                    let id = self.attr(child, "id").ok_or(SceneLoadError::MissingField("bsdf.id"))?;
                    let bsdf = self.load_bsdf(child)?;
                    let plugin_type = self.plugin_type(child);
                    self.bsdf_types.insert(id.clone(), plugin_type);
                    self.bsdfs.insert(id, bsdf);
                }
                "shape" => {
                    let (shape, material) = self.load_shape(child)?;
                    let material: Arc<dyn BSDF> = match material {
                        Some(material) => material,
                        None => Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.5))),
                    };
                    let mut object = SceneObject::new(shape.clone(), material);
                    if let Some(id) = self.attr(child, "id") {
                        self.shapes.insert(id.clone(), shape);
                        object = object.with_name(id);
                    }
                    self.scene.add_object(object);
                }
                "emitter" => self.load_emitter(child)?,
                other => log::warn!("Ignoring unsupported element <{}>.", other),
            }
        }
        Ok(())
    }

    // Sensors need the final scene bounds, so they are built last.
    fn finish(mut self) -> Result<SceneLoadResult, SceneLoadError> {
        for builder in std::mem::take(&mut self.sensors) {
            let sensor = builder.build(self.scene.bbox())?;
            log::debug!("{}", ComputationNode::to_string(&sensor));
            self.scene.add_sensor(Box::new(sensor));
        }

        log::info!("Loaded scene with {} shapes, {} emitters and {} sensors.",
                   self.scene.len(), self.scene.emitters().len(), self.scene.sensors().len());

        let integrator = if self.has_integrator {
            Some(Box::new(PathIntegrator::new(self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
                                              self.samples_per_pixel.unwrap_or(1)))
                 as Box<dyn Integrator>)
        } else {
            None
        };

        Ok(SceneLoadResult {
            scene: self.scene,
            integrator,
            samples_per_pixel: self.samples_per_pixel,
            max_depth: self.max_depth,
        })
    }

    fn attr(&self, element: &XmlElement, key: &str) -> Option<String> {
        element.raw_attr(key).map(|raw| self.resolve_value(raw))
    }

    fn plugin_type(&self, element: &XmlElement) -> String {
        self.attr(element, "type").unwrap_or_default()
    }

    fn resolve_value(&self, raw: &str) -> String {
        let mut out = raw.to_string();
        for (k, v) in &self.defaults {
            out = out.replace(&format!("${}", k), v);
        }
        out
    }

    fn param<'a>(&self, element: &'a XmlElement, tags: &[&str], name: &str) -> Option<&'a XmlElement> {
        element.children.iter()
            .find(|child| tags.contains(&child.tag.as_str()) && child.name() == Some(name))
    }

    fn float_param(&self, element: &XmlElement, name: &str) -> Result<Option<Float>, SceneLoadError> {
        match self.param(element, &["float"], name).and_then(|p| self.attr(p, "value")) {
            Some(value) => Ok(Some(parse_float(&value)?)),
            None => Ok(None),
        }
    }

    fn integer_param(&self, element: &XmlElement, name: &str) -> Result<Option<i64>, SceneLoadError> {
        match self.param(element, &["integer"], name).and_then(|p| self.attr(p, "value")) {
            Some(value) => value.trim().parse::<i64>()
                .map(Some)
                .map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value))),
            None => Ok(None),
        }
    }

    fn spectrum_param(&self, element: &XmlElement, name: &str) -> Result<Option<RGBSpectrum>, SceneLoadError> {
        let param = match self.param(element, &["rgb", "float", "spectrum"], name) {
            Some(param) => param,
            None => return Ok(None),
        };
        let value = self.attr(param, "value").ok_or(SceneLoadError::MissingField("spectrum.value"))?;
        let values = parse_floats(&value)?;
        match values.as_slice() {
            [v] => Ok(Some(RGBSpectrum::splat(*v))),
            [r, g, b] => Ok(Some(RGBSpectrum::new(*r, *g, *b))),
            _ => Err(SceneLoadError::Parse(format!("invalid color value: {}", value))),
        }
    }

    // `<point>`/`<vector>` given either as `x`/`y`/`z` or a `value` list.
    fn parse_point(&self, element: &XmlElement) -> Result<Vector3f, SceneLoadError> {
        if let Some(value) = self.attr(element, "value") {
            return parse_vec3(&value);
        }
        let mut p = Vector3f::zeros();
        for (idx, key) in ["x", "y", "z"].iter().enumerate() {
            if let Some(value) = self.attr(element, key) {
                p[idx] = parse_float(&value)?;
            }
        }
        Ok(p)
    }

    fn parse_transform(&self, element: &XmlElement) -> Result<Transform, SceneLoadError> {
        let mut transform = Transform::default();
        for op in &element.children {
            let step = match op.tag.as_str() {
                "translate" => Transform::translate(self.parse_point(op)?),
                "scale" => {
                    let s = match self.attr(op, "value") {
                        Some(value) => match parse_floats(&value)?.as_slice() {
                            [s] => Vector3f::new(*s, *s, *s),
                            [x, y, z] => Vector3f::new(*x, *y, *z),
                            _ => return Err(SceneLoadError::Parse(format!("invalid scale: {}", value))),
                        },
                        None => {
                            let mut s = Vector3f::new(1.0, 1.0, 1.0);
                            for (idx, key) in ["x", "y", "z"].iter().enumerate() {
                                if let Some(value) = self.attr(op, key) {
                                    s[idx] = parse_float(&value)?;
                                }
                            }
                            s
                        }
                    };
                    Transform::scale(s)
                }
                "rotate" => {
                    let angle = self.attr(op, "angle").ok_or(SceneLoadError::MissingField("rotate.angle"))?;
                    Transform::rotate(self.parse_point(op)?, parse_float(&angle)?)
                }
                "matrix" => {
                    let value = self.attr(op, "value").ok_or(SceneLoadError::MissingField("matrix.value"))?;
                    let values = parse_floats(&value)?;
                    if values.len() != 16 {
                        return Err(SceneLoadError::Parse(format!("matrix needs 16 values, got {}", values.len())));
                    }
                    Transform::new(Matrix4f::from_row_slice(&values))
                }
                "lookat" => {
                    let origin = self.attr(op, "origin").ok_or(SceneLoadError::MissingField("lookat.origin"))?;
                    let target = self.attr(op, "target").ok_or(SceneLoadError::MissingField("lookat.target"))?;
                    let up = match self.attr(op, "up") {
                        Some(up) => parse_vec3(&up)?,
                        None => Vector3f::new(0.0, 0.0, 1.0),
                    };
                    Transform::look_at(parse_vec3(&origin)?, parse_vec3(&target)?, up)
                }
                other => {
                    return Err(SceneLoadError::Unsupported { tag: "transform".to_string(),
                                                             plugin_type: other.to_string() });
                }
            };
            transform = step * transform;
        }
        Ok(transform)
    }

    fn transform_param(&self, element: &XmlElement, name: &str) -> Result<Option<Transform>, SceneLoadError> {
        match self.param(element, &["transform"], name) {
            Some(t) => Ok(Some(self.parse_transform(t)?)),
            None => Ok(None),
        }
    }

    fn load_integrator(&mut self, element: &XmlElement) -> Result<(), SceneLoadError> {
        let integrator_type = self.plugin_type(element);
        if integrator_type != "path" {
            return Err(SceneLoadError::Unsupported { tag: "integrator".to_string(), plugin_type: integrator_type });
        }
        self.has_integrator = true;
        if let Some(depth) = self.integer_param(element, "max_depth")? {
            // Negative depths mean unbounded.
            self.max_depth = Some(u32::try_from(depth).unwrap_or(u32::MAX));
        }
        Ok(())
    }

    fn load_bsdf(&self, element: &XmlElement) -> Result<Arc<dyn BSDF>, SceneLoadError> {
        let bsdf_type = self.plugin_type(element);
        match bsdf_type.as_str() {
            "diffuse" => {
                let reflectance = self.spectrum_param(element, "reflectance")?
                    .unwrap_or(RGBSpectrum::splat(0.5));
                Ok(Arc::new(LambertianDiffuseBSDF::new(reflectance)))
            }
            _ => Err(SceneLoadError::Unsupported { tag: "bsdf".to_string(), plugin_type: bsdf_type }),
        }
    }

    fn load_shape(&self, element: &XmlElement) -> Result<(Arc<dyn Shape>, Option<Arc<dyn BSDF>>), SceneLoadError> {
        let shape_type = self.plugin_type(element);
        let to_world = self.transform_param(element, "to_world")?.unwrap_or_default();

        let mut material = None;
        for child in &element.children {
            match child.tag.as_str() {
                "bsdf" => material = Some(self.load_bsdf(child)?),
                "ref" => {
                    let id = self.attr(child, "id").ok_or(SceneLoadError::MissingField("ref.id"))?;
                    let bsdf = self.bsdfs.get(&id)
                        .ok_or_else(|| SceneLoadError::Parse(format!("missing bsdf ref: {}", id)))?;
                    material = Some(bsdf.clone());
                }
                "emitter" => {
                    return Err(SceneLoadError::Unsupported { tag: "emitter".to_string(),
                                                             plugin_type: self.plugin_type(child) });
                }
                _ => {}
            }
        }

        let id = self.attr(element, "id");
        let shape: Arc<dyn Shape> = match shape_type.as_str() {
            "rectangle" => {
                let shape = Rectangle::new(to_world);
                Arc::new(match id { Some(id) => shape.with_id(id), None => shape })
            }
            "disk" => {
                let shape = Disk::new(to_world);
                Arc::new(match id { Some(id) => shape.with_id(id), None => shape })
            }
            _ => return Err(SceneLoadError::Unsupported { tag: "shape".to_string(), plugin_type: shape_type }),
        };
        Ok((shape, material))
    }

    fn load_emitter(&mut self, element: &XmlElement) -> Result<(), SceneLoadError> {
        let emitter_type = self.plugin_type(element);
        if emitter_type != "directional" {
            return Err(SceneLoadError::Unsupported { tag: "emitter".to_string(), plugin_type: emitter_type });
        }

        let direction = match self.param(element, &["vector", "point"], "direction") {
            Some(p) => self.parse_point(p)?,
            None => match self.transform_param(element, "to_world")? {
                Some(t) => t.apply_vector(Vector3f::new(0.0, 0.0, 1.0)),
                None => return Err(SceneLoadError::MissingField("emitter.direction")),
            },
        };
        let irradiance = self.spectrum_param(element, "irradiance")?.unwrap_or(RGBSpectrum::splat(1.0));
        self.scene.add_emitter(Box::new(DirectionalEmitter::new(direction, irradiance)));
        Ok(())
    }

    fn load_film(&self, element: &XmlElement) -> Result<Film, SceneLoadError> {
        let width = self.integer_param(element, "width")?.unwrap_or(1);
        let height = self.integer_param(element, "height")?.unwrap_or(1);
        let width = usize::try_from(width)
            .map_err(|_| SceneLoadError::Parse(format!("invalid film width: {}", width)))?;
        let height = usize::try_from(height)
            .map_err(|_| SceneLoadError::Parse(format!("invalid film height: {}", height)))?;

        let mut film = Film::new(width, height);
        if let Some(rfilter) = element.children.iter().find(|c| c.tag == "rfilter") {
            let filter = match self.plugin_type(rfilter).as_str() {
                "box" => ReconstructionFilter::Box,
                "gaussian" => ReconstructionFilter::Gaussian {
                    stddev: self.float_param(rfilter, "stddev")?.unwrap_or(0.5),
                },
                other => {
                    return Err(SceneLoadError::Unsupported { tag: "rfilter".to_string(),
                                                             plugin_type: other.to_string() });
                }
            };
            film = film.with_filter(filter);
        }
        Ok(film)
    }

    fn load_scene_node(&self, element: &XmlElement) -> Result<SceneNode, SceneLoadError> {
        match element.tag.as_str() {
            "point" => Ok(SceneNode::Point(self.parse_point(element)?)),
            "shape" => Ok(SceneNode::Shape(self.load_shape(element)?.0)),
            "ref" => {
                let id = self.attr(element, "id").ok_or(SceneLoadError::MissingField("ref.id"))?;
                match self.shapes.get(&id) {
                    Some(shape) => Ok(SceneNode::Shape(shape.clone())),
                    None => match self.bsdf_types.get(&id) {
                        Some(plugin_type) => Ok(SceneNode::Object {
                            tag: "bsdf".to_string(),
                            plugin_type: plugin_type.clone(),
                            id: Some(id),
                        }),
                        None => Err(SceneLoadError::Parse(format!("unknown reference: {}", id))),
                    },
                }
            }
            other => Ok(SceneNode::Object {
                tag: other.to_string(),
                plugin_type: self.plugin_type(element),
                id: self.attr(element, "id"),
            }),
        }
    }

    fn load_sensor(&mut self, element: &XmlElement) -> Result<DistantSensorBuilder, SceneLoadError> {
        let sensor_type = self.plugin_type(element);
        if sensor_type != "distant" {
            return Err(SceneLoadError::Unsupported { tag: "sensor".to_string(), plugin_type: sensor_type });
        }

        let mut builder = DistantSensorBuilder::new();
        if let Some(id) = self.attr(element, "id") {
            builder = builder.id(id);
        }

        for child in &element.children {
            match (child.tag.as_str(), child.name()) {
                (_, Some("ray_target")) => builder = builder.ray_target_node(self.load_scene_node(child)?)?,
                (_, Some("ray_origin")) => builder = builder.ray_origin_node(self.load_scene_node(child)?)?,
                ("vector", Some("direction")) | ("point", Some("direction")) => {
                    builder = builder.direction(self.parse_point(child)?);
                }
                ("transform", Some("to_world")) => builder = builder.to_world(self.parse_transform(child)?),
                ("film", _) => builder = builder.film(self.load_film(child)?),
                ("sampler", _) => {
                    if let Some(count) = self.integer_param(child, "sample_count")? {
                        let count = u32::try_from(count)
                            .map_err(|_| SceneLoadError::Parse(format!("invalid sample_count: {}", count)))?;
                        self.samples_per_pixel = Some(count);
                    }
                }
                (tag, name) => log::warn!("Ignoring sensor parameter <{}> ({:?}).", tag, name),
            }
        }
        Ok(builder)
    }
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_floats(value: &str) -> Result<Vec<Float>, SceneLoadError> {
    value.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_float)
        .collect()
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    match parse_floats(value)?.as_slice() {
        [x, y, z] => Ok(Vector3f::new(*x, *y, *z)),
        _ => Err(SceneLoadError::Parse(format!("invalid vec3: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::{Vector2f, INV_PI, PI};
    use crate::renderers::simple::{Renderer, SimpleRenderer};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn radiometric_scene(w_e: &Vector3f, w_o: &Vector3f, ray_target: &str, spp: u32) -> String {
        format!(r#"<scene version="3.0.0">
            <default name="spp" value="{spp}"/>
            <integrator type="path">
                <integer name="max_depth" value="2"/>
            </integrator>
            <shape type="rectangle" id="surface">
                <bsdf type="diffuse">
                    <rgb name="reflectance" value="1.0"/>
                </bsdf>
            </shape>
            <emitter type="directional">
                <vector name="direction" value="{}, {}, {}"/>
                <rgb name="irradiance" value="1.0"/>
            </emitter>
            <sensor type="distant">
                <vector name="direction" x="{}" y="{}" z="{}"/>
                {ray_target}
                <film type="hdrfilm">
                    <integer name="width" value="1"/>
                    <integer name="height" value="1"/>
                    <rfilter type="box"/>
                </film>
                <sampler type="independent">
                    <integer name="sample_count" value="$spp"/>
                </sampler>
            </sensor>
        </scene>"#, w_e.x, w_e.y, w_e.z, w_o.x, w_o.y, w_o.z)
    }

    fn measure(xml: &str) -> Float {
        let result = parse_scene(xml).expect("scene loads");
        let mut scene = result.scene;
        let integrator = result.integrator.expect("scene declares an integrator");
        let renderer = SimpleRenderer::new(integrator, 0, 0).with_progress(false);
        let bitmap = renderer.render(&mut scene).expect("sensor 0 exists");
        bitmap[(0, 0)].x
    }

    fn directions() -> Vec<Vector3f> {
        vec![Vector3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 1.0, -1.0)]
    }

    // Radiance leaving the unit-albedo plane lit by unit irradiance.
    fn plane_radiance(w_e: &Vector3f) -> Float {
        w_e.normalize().z.abs() * INV_PI
    }

    fn check_target(ray_target: &str, area: Float, spp: u32, rtol: Float) {
        for w_e in directions() {
            for w_o in directions() {
                let expected = plane_radiance(&w_e) * w_o.normalize().z.abs() * area;
                let value = measure(&radiometric_scene(&w_e, &w_o, ray_target, spp));
                assert_relative_eq!(value, expected, max_relative = rtol);
            }
        }
    }

    #[test]
    fn test_radiometry_rectangle_target() {
        check_target(r#"<shape type="rectangle" name="ray_target"/>"#, 4.0, 64, 5e-3);
    }

    #[test]
    fn test_radiometry_small_rectangle_target() {
        check_target(r#"<shape type="rectangle" name="ray_target">
                            <transform name="to_world"><scale value="0.5"/></transform>
                        </shape>"#, 1.0, 64, 5e-3);
    }

    #[test]
    fn test_radiometry_large_rectangle_target() {
        // Only a quarter of the target overlaps the lit plane.
        check_target(r#"<shape type="rectangle" name="ray_target">
                            <transform name="to_world"><scale x="2" y="2"/></transform>
                        </shape>"#, 4.0, 400_000, 1e-2);
    }

    #[test]
    fn test_radiometry_disk_target() {
        check_target(r#"<shape type="disk" name="ray_target"/>"#, PI, 64, 5e-3);
    }

    #[test]
    fn test_radiometry_point_target() {
        check_target(r#"<point name="ray_target" x="0.1" y="-0.2" z="0"/>"#, 1.0, 16, 5e-3);
    }

    #[test]
    fn test_radiometry_default_target() {
        for w_e in directions() {
            for w_o in directions() {
                let value = measure(&radiometric_scene(&w_e, &w_o, "", 16));
                assert_relative_eq!(value, plane_radiance(&w_e), max_relative = 5e-3);
            }
        }
    }

    #[test]
    fn test_load_shape_origin() {
        let xml = r#"<scene version="3.0.0">
            <shape type="rectangle"/>
            <sensor type="distant">
                <vector name="direction" value="0, -2, -1"/>
                <shape type="rectangle" name="ray_origin">
                    <transform name="to_world">
                        <scale value="10"/>
                        <translate z="3.42"/>
                    </transform>
                </shape>
            </sensor>
        </scene>"#;
        let result = parse_scene(xml).expect("scene loads");
        let sensor = result.scene.sensor(0).expect("one sensor");
        let sample = Vector2f::new(0.3, 0.6);
        let (ray, weight) = sensor.sample_ray(0.0, 0.5, &sample, &sample, true);
        assert_abs_diff_eq!(ray.origin().z, 3.42, epsilon = 1e-4);
        assert_eq!(weight, 1.0);
    }

    #[test]
    fn test_load_ray_target_by_reference() {
        let xml = r#"<scene version="3.0.0">
            <shape type="disk" id="target_disk"/>
            <sensor type="distant">
                <ref id="target_disk" name="ray_target"/>
            </sensor>
        </scene>"#;
        let result = parse_scene(xml).expect("scene loads");
        let sensor = result.scene.sensor(0).expect("one sensor");
        let sample = Vector2f::new(0.5, 0.5);
        let (_, weight) = sensor.sample_ray(0.0, 0.5, &sample, &sample, true);
        assert_relative_eq!(weight, PI, max_relative = 1e-5);
    }

    #[test]
    fn test_reject_invalid_ray_target() {
        let xml = r#"<scene version="3.0.0">
            <sensor type="distant">
                <emitter type="constant" name="ray_target"/>
            </sensor>
        </scene>"#;
        assert!(matches!(parse_scene(xml),
                         Err(SceneLoadError::Sensor(SensorError::InvalidRayTarget(_)))));

        let xml = r#"<scene version="3.0.0">
            <bsdf type="diffuse" id="white"/>
            <sensor type="distant">
                <ref id="white" name="ray_origin"/>
            </sensor>
        </scene>"#;
        match parse_scene(xml) {
            Err(SceneLoadError::Sensor(SensorError::InvalidRayOrigin(what))) => {
                assert_eq!(what, "bsdf 'white' of type 'diffuse'");
            }
            _ => panic!("a bsdf is not a valid ray origin"),
        }
    }

    #[test]
    fn test_reject_film_size() {
        let xml = r#"<scene version="3.0.0">
            <sensor type="distant">
                <film type="hdrfilm">
                    <integer name="width" value="2"/>
                    <integer name="height" value="2"/>
                </film>
            </sensor>
        </scene>"#;
        assert!(matches!(parse_scene(xml),
                         Err(SceneLoadError::Sensor(SensorError::FilmSize { width: 2, height: 2 }))));
    }

    #[test]
    fn test_reject_unsupported_plugins() {
        let xml = r#"<scene version="3.0.0"><sensor type="perspective"/></scene>"#;
        assert!(matches!(parse_scene(xml), Err(SceneLoadError::Unsupported { .. })));

        let xml = r#"<scene version="3.0.0"><shape type="sphere"/></scene>"#;
        assert!(matches!(parse_scene(xml), Err(SceneLoadError::Unsupported { .. })));

        assert!(matches!(parse_scene("<scene><shape></scene>"), Err(SceneLoadError::Parse(_))));
    }

    #[test]
    fn test_transform_ops_apply_in_order() {
        let xml = r#"<scene version="3.0.0">
            <shape type="rectangle" id="moved">
                <transform name="to_world">
                    <scale value="2"/>
                    <rotate x="1" angle="90"/>
                    <translate x="1" y="2" z="3"/>
                </transform>
            </shape>
        </scene>"#;
        let result = parse_scene(xml).expect("scene loads");
        let bbox = result.scene.bbox();
        assert_abs_diff_eq!(bbox.p_min.x, -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bbox.p_max.x, 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bbox.p_min.y, 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bbox.p_max.y, 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bbox.p_min.z, 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bbox.p_max.z, 5.0, epsilon = 1e-4);
        assert!(result.integrator.is_none());
    }
}
