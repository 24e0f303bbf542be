//! Glass-like glyph shading.
//!
//! A [`ShadingProgram`] is the per-glyph uniform state plus the program
//! sources it is compiled from. Programs are never shared between glyphs: the
//! frame loop writes time and camera uniforms into each one independently.
//!
//! The surface model lives in `glyph.frag`. [`ShadingProgram::shade`] is a CPU
//! transcription of the same model, used to check its invariants without a GPU.

use glam::{Vec3, Vec4};

use crate::config::{LightingConfig, PointLight, MAX_LIGHTS};
use crate::scroll::smoothstep;

const VERTEX_SOURCE: &str = include_str!("glyph.vert");
const FRAGMENT_BODY: &str = include_str!("glyph.frag");

pub const U_MODEL: &str = "uModel";
pub const U_VIEW: &str = "uView";
pub const U_PROJECTION: &str = "uProjection";
pub const U_NORMAL_MATRIX: &str = "uNormalMatrix";
pub const U_CAMERA_POSITION: &str = "uCameraPosition";
pub const U_TIME: &str = "uTime";
pub const U_AMBIENT_COLOR: &str = "uAmbientColor";
pub const U_AMBIENT_INTENSITY: &str = "uAmbientIntensity";
pub const U_LIGHT_POSITIONS: &str = "uPointLightPositions";
pub const U_LIGHT_COLORS: &str = "uPointLightColors";
pub const U_LIGHT_INTENSITIES: &str = "uPointLightIntensities";
pub const U_NUM_LIGHTS: &str = "uNumLights";

/// GLSL ES 3.00 sources for one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

/// Fixed surface constants baked into the fragment program.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Surface {
    pub gradient_bottom: Vec3,
    pub gradient_middle: Vec3,
    pub gradient_top: Vec3,
    pub gradient_range: (f32, f32),
    pub metalness: f32,
    pub shininess: f32,
    pub rim_exponent: f32,
    pub rim_strength: f32,
    pub base_opacity: f32,
    pub rim_opacity: f32,
    pub specular_opacity: f32,
}

impl From<&LightingConfig> for Surface {
    fn from(cfg: &LightingConfig) -> Self {
        Self {
            gradient_bottom: cfg.gradient_bottom,
            gradient_middle: cfg.gradient_middle,
            gradient_top: cfg.gradient_top,
            gradient_range: cfg.gradient_range,
            metalness: cfg.metalness,
            shininess: cfg.shininess,
            rim_exponent: cfg.rim_exponent,
            rim_strength: cfg.rim_strength,
            base_opacity: cfg.base_opacity,
            rim_opacity: cfg.rim_opacity,
            specular_opacity: cfg.specular_opacity,
        }
    }
}

impl Surface {
    /// Three-stop vertical gradient: bottom below the middle of the range,
    /// top above it.
    pub fn gradient_color(&self, world_y: f32) -> Vec3 {
        let (lo, hi) = self.gradient_range;
        let f = ((world_y - lo) / (hi - lo)).clamp(0.0, 1.0);
        if f < 0.5 {
            self.gradient_bottom.lerp(self.gradient_middle, f * 2.0)
        } else {
            self.gradient_middle.lerp(self.gradient_top, (f - 0.5) * 2.0)
        }
    }

    /// Edge brightening: 0 facing the viewer, 1 at grazing angles.
    pub fn rim_factor(&self, view_dir: Vec3, normal: Vec3) -> f32 {
        smoothstep(1.0 - view_dir.dot(normal), 0.0, 1.0).powf(self.rim_exponent)
    }

    /// Translucency of the glass: broad faces see-through, rims and direct
    /// highlights opaque.
    pub fn alpha(&self, rim: f32, total_specular: f32) -> f32 {
        (self.base_opacity + self.rim_opacity * rim + self.specular_opacity * total_specular)
            .clamp(0.0, 1.0)
    }

    /// `#define` prelude that turns `glyph.frag` into a complete program.
    fn fragment_prelude(&self) -> String {
        let (lo, hi) = self.gradient_range;
        let mut out = String::from("#version 300 es\nprecision highp float;\n");
        let mut define = |name: &str, value: String| {
            out.push_str("#define ");
            out.push_str(name);
            out.push(' ');
            out.push_str(&value);
            out.push('\n');
        };
        define("MAX_LIGHTS", MAX_LIGHTS.to_string());
        define("METALNESS", glsl_float(self.metalness));
        define("SHININESS", glsl_float(self.shininess));
        define("GRADIENT_MIN", glsl_float(lo));
        define("GRADIENT_MAX", glsl_float(hi));
        define("GRADIENT_BOTTOM", glsl_vec3(self.gradient_bottom));
        define("GRADIENT_MIDDLE", glsl_vec3(self.gradient_middle));
        define("GRADIENT_TOP", glsl_vec3(self.gradient_top));
        define("RIM_EXPONENT", glsl_float(self.rim_exponent));
        define("RIM_STRENGTH", glsl_float(self.rim_strength));
        define("BASE_OPACITY", glsl_float(self.base_opacity));
        define("RIM_OPACITY", glsl_float(self.rim_opacity));
        define("SPECULAR_OPACITY", glsl_float(self.specular_opacity));
        out
    }
}

/// A surface point as the fragment program sees it (world space).
#[derive(Debug, Copy, Clone)]
pub struct Fragment {
    pub position: Vec3,
    pub normal: Vec3,
    pub view_dir: Vec3,
}

/// Output of [`ShadingProgram::shade`].
#[derive(Debug, Copy, Clone)]
pub struct Shaded {
    pub color: Vec4,
    pub rim: f32,
    pub total_specular: f32,
}

/// Per-glyph material: uniform state plus sources.
#[derive(Debug, Clone)]
pub struct ShadingProgram {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    /// At most [`MAX_LIGHTS`] lights.
    pub lights: Vec<PointLight>,
    /// Seconds since mount. Reserved for time-based variation.
    pub time: f32,
    pub camera_position: Vec3,
    pub surface: Surface,
    pub sources: ShaderSources,
}

impl ShadingProgram {
    /// Positions, colors and intensities flattened for `uniform*fv` uploads,
    /// padded to [`MAX_LIGHTS`] entries.
    pub fn light_arrays(&self) -> ([f32; MAX_LIGHTS * 3], [f32; MAX_LIGHTS * 3], [f32; MAX_LIGHTS]) {
        let mut positions = [0.0; MAX_LIGHTS * 3];
        let mut colors = [0.0; MAX_LIGHTS * 3];
        let mut intensities = [0.0; MAX_LIGHTS];
        for (i, light) in self.lights.iter().take(MAX_LIGHTS).enumerate() {
            positions[i * 3..i * 3 + 3].copy_from_slice(&light.position.to_array());
            colors[i * 3..i * 3 + 3].copy_from_slice(&light.color.to_array());
            intensities[i] = light.intensity;
        }
        (positions, colors, intensities)
    }

    /// Number of active lights as uploaded to `uNumLights`.
    pub fn light_count(&self) -> i32 {
        self.lights.len().min(MAX_LIGHTS) as i32
    }

    /// Evaluate the fragment program on the CPU.
    pub fn shade(&self, frag: &Fragment) -> Shaded {
        let s = &self.surface;
        let normal = frag.normal.normalize_or_zero();
        let view_dir = frag.view_dir.normalize_or_zero();
        let base = s.gradient_color(frag.position.y);

        let mut color = self.ambient_color * self.ambient_intensity * base;
        let mut total_specular = 0.0;

        for light in self.lights.iter().take(MAX_LIGHTS) {
            let to_light = light.position - frag.position;
            let dist = to_light.length();
            let light_dir = to_light / dist.max(1e-6);
            let attenuation = light.intensity / (dist * dist + 1.0);

            let diff = normal.dot(light_dir).max(0.0);
            let diffuse = light.color * diff * attenuation * (1.0 - s.metalness);

            let reflect_dir = reflect(-light_dir, normal);
            let spec = view_dir.dot(reflect_dir).max(0.0).powf(s.shininess);
            let specular = light.color * spec * attenuation * s.metalness;

            total_specular += spec;
            color += (diffuse + specular) * base;
        }

        let rim = s.rim_factor(view_dir, normal);
        color += Vec3::ONE * rim * s.rim_strength;

        Shaded {
            color: color.extend(s.alpha(rim, total_specular)),
            rim,
            total_specular,
        }
    }
}

/// Builds independent [`ShadingProgram`]s with the configured light rig.
#[derive(Debug, Clone)]
pub struct MaterialFactory {
    ambient_color: Vec3,
    ambient_intensity: f32,
    lights: Vec<PointLight>,
    surface: Surface,
    sources: ShaderSources,
}

impl MaterialFactory {
    pub fn new(cfg: &LightingConfig) -> Self {
        if cfg.lights.len() > MAX_LIGHTS {
            log::warn!(
                "{} point lights configured, only the first {} are used",
                cfg.lights.len(),
                MAX_LIGHTS
            );
        }
        let surface = Surface::from(cfg);
        let sources = ShaderSources {
            vertex: VERTEX_SOURCE.to_string(),
            fragment: format!("{}{}", surface.fragment_prelude(), FRAGMENT_BODY),
        };
        Self {
            ambient_color: cfg.ambient_color,
            ambient_intensity: cfg.ambient_intensity,
            lights: cfg.lights.iter().take(MAX_LIGHTS).copied().collect(),
            surface,
            sources,
        }
    }

    pub fn create(&self) -> ShadingProgram {
        ShadingProgram {
            ambient_color: self.ambient_color,
            ambient_intensity: self.ambient_intensity,
            lights: self.lights.clone(),
            time: 0.0,
            camera_position: Vec3::ZERO,
            surface: self.surface,
            sources: self.sources.clone(),
        }
    }
}

#[inline]
fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// `Debug` for `f32` always prints a decimal point or exponent, which is
/// what GLSL needs to type the literal as float.
fn glsl_float(v: f32) -> String {
    format!("{v:?}")
}

fn glsl_vec3(v: Vec3) -> String {
    format!("vec3({}, {}, {})", glsl_float(v.x), glsl_float(v.y), glsl_float(v.z))
}
