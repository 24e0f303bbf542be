use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

use crate::error::SceneError;
use crate::glyph::extrude::{GlyphMesh, Vertex};
use crate::shading::{self, ShaderSources, ShadingProgram};
use crate::stage::{Backend, DrawTransforms};

const ATTR_POSITION: u32 = 0;
const ATTR_NORMAL: u32 = 1;

pub struct GlMesh {
    vao: WebGlVertexArrayObject,
    vbo: WebGlBuffer,
    count: i32,
}

struct Locations {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    normal: Option<WebGlUniformLocation>,
    camera_position: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    ambient_color: Option<WebGlUniformLocation>,
    ambient_intensity: Option<WebGlUniformLocation>,
    light_positions: Option<WebGlUniformLocation>,
    light_colors: Option<WebGlUniformLocation>,
    light_intensities: Option<WebGlUniformLocation>,
    num_lights: Option<WebGlUniformLocation>,
}

impl Locations {
    // Uniforms the compiler optimized out come back as `None`; setting them
    // is a no-op.
    fn lookup(gl: &GL, program: &WebGlProgram) -> Self {
        let loc = |name: &str| gl.get_uniform_location(program, name);
        Self {
            model: loc(shading::U_MODEL),
            view: loc(shading::U_VIEW),
            projection: loc(shading::U_PROJECTION),
            normal: loc(shading::U_NORMAL_MATRIX),
            camera_position: loc(shading::U_CAMERA_POSITION),
            time: loc(shading::U_TIME),
            ambient_color: loc(shading::U_AMBIENT_COLOR),
            ambient_intensity: loc(shading::U_AMBIENT_INTENSITY),
            light_positions: loc(shading::U_LIGHT_POSITIONS),
            light_colors: loc(shading::U_LIGHT_COLORS),
            light_intensities: loc(shading::U_LIGHT_INTENSITIES),
            num_lights: loc(shading::U_NUM_LIGHTS),
        }
    }
}

pub struct GlProgram {
    program: WebGlProgram,
    locations: Locations,
}

/// [`Backend`] over a WebGL2 context.
///
/// Glyphs are translucent and two-sided: blending on, depth test on, depth
/// writes off, no face culling. Overlapping glyphs composite in draw order.
pub struct WebGlBackend {
    gl: GL,
    clear_color: [f32; 4],
}

impl WebGlBackend {
    pub fn new(gl: GL, clear_color: [f32; 4]) -> Self {
        gl.enable(GL::BLEND);
        // The canvas is premultiplied and cleared transparent: alpha
        // accumulates as `src + dst * (1 - src)` so colour never exceeds it.
        gl.blend_func_separate(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA, GL::ONE, GL::ONE_MINUS_SRC_ALPHA);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_mask(false);
        gl.disable(GL::CULL_FACE);
        Self { gl, clear_color }
    }

    fn compile_shader(&self, kind: u32, stage: &'static str, src: &str) -> Result<WebGlShader, SceneError> {
        let gl = &self.gl;
        let shader = gl
            .create_shader(kind)
            .ok_or(SceneError::Allocation("shader"))?;
        gl.shader_source(&shader, src);
        gl.compile_shader(&shader);

        if gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(shader)
        } else {
            let log = gl.get_shader_info_log(&shader).unwrap_or_default();
            gl.delete_shader(Some(&shader));
            Err(SceneError::ShaderCompile { stage, log })
        }
    }
}

impl Backend for WebGlBackend {
    type Mesh = GlMesh;
    type Program = GlProgram;

    fn upload_mesh(&mut self, mesh: &GlyphMesh) -> Result<GlMesh, SceneError> {
        let gl = &self.gl;
        let vao = gl
            .create_vertex_array()
            .ok_or(SceneError::Allocation("vertex array"))?;
        let Some(vbo) = gl.create_buffer() else {
            gl.delete_vertex_array(Some(&vao));
            return Err(SceneError::Allocation("vertex buffer"));
        };

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));
        gl.buffer_data_with_u8_array(GL::ARRAY_BUFFER, mesh.as_bytes(), GL::STATIC_DRAW);

        let stride = std::mem::size_of::<Vertex>() as i32;
        let normal_offset = std::mem::size_of::<[f32; 3]>() as i32;
        gl.enable_vertex_attrib_array(ATTR_POSITION);
        gl.vertex_attrib_pointer_with_i32(ATTR_POSITION, 3, GL::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(ATTR_NORMAL);
        gl.vertex_attrib_pointer_with_i32(ATTR_NORMAL, 3, GL::FLOAT, false, stride, normal_offset);

        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);

        Ok(GlMesh {
            vao,
            vbo,
            count: mesh.vertex_count() as i32,
        })
    }

    fn compile_program(&mut self, sources: &ShaderSources) -> Result<GlProgram, SceneError> {
        let vs = self.compile_shader(GL::VERTEX_SHADER, "vertex", &sources.vertex)?;
        let fs = match self.compile_shader(GL::FRAGMENT_SHADER, "fragment", &sources.fragment) {
            Ok(fs) => fs,
            Err(e) => {
                self.gl.delete_shader(Some(&vs));
                return Err(e);
            }
        };

        let gl = &self.gl;
        let program = gl
            .create_program()
            .ok_or(SceneError::Allocation("program"))?;
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.bind_attrib_location(&program, ATTR_POSITION, "aPosition");
        gl.bind_attrib_location(&program, ATTR_NORMAL, "aNormal");
        gl.link_program(&program);

        // the linked program keeps its own copy
        gl.detach_shader(&program, &vs);
        gl.detach_shader(&program, &fs);
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));

        if !gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            return Err(SceneError::ProgramLink(log));
        }

        let locations = Locations::lookup(gl, &program);
        Ok(GlProgram { program, locations })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn begin_frame(&mut self) {
        let [r, g, b, a] = self.clear_color;
        self.gl.clear_color(r, g, b, a);
        // depth writes are off for the glyphs, re-enable just for the clear
        self.gl.depth_mask(true);
        self.gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        self.gl.depth_mask(false);
    }

    fn draw(
        &mut self,
        program: &GlProgram,
        mesh: &GlMesh,
        transforms: &DrawTransforms,
        material: &ShadingProgram,
    ) {
        let gl = &self.gl;
        let loc = &program.locations;
        gl.use_program(Some(&program.program));

        gl.uniform_matrix4fv_with_f32_array(loc.model.as_ref(), false, &transforms.model.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(loc.view.as_ref(), false, &transforms.view.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(
            loc.projection.as_ref(),
            false,
            &transforms.projection.to_cols_array(),
        );
        gl.uniform_matrix3fv_with_f32_array(loc.normal.as_ref(), false, &transforms.normal.to_cols_array());

        let cam = material.camera_position;
        gl.uniform3f(loc.camera_position.as_ref(), cam.x, cam.y, cam.z);
        gl.uniform1f(loc.time.as_ref(), material.time);

        let ambient = material.ambient_color;
        gl.uniform3f(loc.ambient_color.as_ref(), ambient.x, ambient.y, ambient.z);
        gl.uniform1f(loc.ambient_intensity.as_ref(), material.ambient_intensity);

        let (positions, colors, intensities) = material.light_arrays();
        gl.uniform3fv_with_f32_array(loc.light_positions.as_ref(), &positions);
        gl.uniform3fv_with_f32_array(loc.light_colors.as_ref(), &colors);
        gl.uniform1fv_with_f32_array(loc.light_intensities.as_ref(), &intensities);
        gl.uniform1i(loc.num_lights.as_ref(), material.light_count());

        gl.bind_vertex_array(Some(&mesh.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, mesh.count);
        gl.bind_vertex_array(None);
    }

    fn delete_mesh(&mut self, mesh: GlMesh) {
        self.gl.delete_vertex_array(Some(&mesh.vao));
        self.gl.delete_buffer(Some(&mesh.vbo));
    }

    fn delete_program(&mut self, program: GlProgram) {
        self.gl.delete_program(Some(&program.program));
    }
}
