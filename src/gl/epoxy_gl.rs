use std::{
    ffi::{CStr, CString, c_char, c_void},
    mem, ptr,
    sync::OnceLock,
};

use libloading::os::unix::Library;

use super::{GlApi, ProgramId, QuadMesh, UniformLocation};
use crate::shader::{GlslProfile, POSITION_ATTRIBUTE, ShaderError, ShaderSources, ShaderStage};
use crate::uniforms::UniformValue;

static EPOXY: OnceLock<Library> = OnceLock::new();

/// Points epoxy's function table at the system libepoxy.
///
/// This needs to happen before any GL call, and specifically before GTK's
/// `GLArea` tries to render. When the library is loaded from GJS, GTK is
/// already initialized but epoxy hasn't been pointed at the right symbols yet.
pub fn load_epoxy() -> Result<(), libloading::Error> {
    if EPOXY.get().is_some() {
        return Ok(());
    }
    let library = unsafe { Library::new("libepoxy.so.0") }?;
    let library = EPOXY.get_or_init(|| library);
    epoxy::load_with(|name| {
        unsafe { library.get::<*const c_void>(name.as_bytes()) }
            .map(|symbol| *symbol)
            .unwrap_or(ptr::null())
    });
    Ok(())
}

/// [`GlApi`] over libepoxy. Only valid while a context is current.
#[derive(Debug, Clone, Copy)]
pub struct EpoxyGl {
    profile: GlslProfile,
}

impl EpoxyGl {
    pub fn new(profile: GlslProfile) -> Self {
        Self { profile }
    }

    fn info_log(
        object: u32,
        get_iv: unsafe fn(u32, u32, *mut i32),
        get_log: unsafe fn(u32, i32, *mut i32, *mut c_char),
    ) -> String {
        let mut log_len = 0i32;
        unsafe { get_iv(object, epoxy::INFO_LOG_LENGTH, &raw mut log_len) };
        let mut buf = vec![0u8; log_len.max(0) as usize];
        let mut written = 0i32;
        unsafe {
            get_log(
                object,
                log_len,
                &raw mut written,
                buf.as_mut_ptr().cast::<c_char>(),
            );
        }
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).trim_end().to_owned()
    }

    fn compile_shader(src: &str, stage: ShaderStage) -> Result<u32, ShaderError> {
        let kind = match stage {
            ShaderStage::Vertex => epoxy::VERTEX_SHADER,
            ShaderStage::Fragment => epoxy::FRAGMENT_SHADER,
        };

        let shader = unsafe { epoxy::CreateShader(kind) };
        let ptr = src.as_ptr().cast::<c_char>();
        let len = src.len() as i32;
        let mut ok = 0i32;
        unsafe {
            epoxy::ShaderSource(shader, 1, &raw const ptr, &raw const len);
            epoxy::CompileShader(shader);
            epoxy::GetShaderiv(shader, epoxy::COMPILE_STATUS, &raw mut ok);
        }
        if ok == 0 {
            let log = Self::info_log(shader, shader_iv, shader_log);
            unsafe { epoxy::DeleteShader(shader) };
            return Err(ShaderError::Compile { stage, log });
        }
        Ok(shader)
    }
}

// Plain fn wrappers so both info-log flavours share one reader.
unsafe fn shader_iv(object: u32, pname: u32, out: *mut i32) {
    unsafe { epoxy::GetShaderiv(object, pname, out) }
}

unsafe fn shader_log(object: u32, len: i32, written: *mut i32, buf: *mut c_char) {
    unsafe { epoxy::GetShaderInfoLog(object, len, written, buf) }
}

unsafe fn program_iv(object: u32, pname: u32, out: *mut i32) {
    unsafe { epoxy::GetProgramiv(object, pname, out) }
}

unsafe fn program_log(object: u32, len: i32, written: *mut i32, buf: *mut c_char) {
    unsafe { epoxy::GetProgramInfoLog(object, len, written, buf) }
}

impl GlApi for EpoxyGl {
    fn glsl_profile(&self) -> GlslProfile {
        self.profile
    }

    fn compile_program(&mut self, sources: &ShaderSources) -> Result<ProgramId, ShaderError> {
        let vert = Self::compile_shader(&sources.vertex, ShaderStage::Vertex)?;
        let frag = match Self::compile_shader(&sources.fragment, ShaderStage::Fragment) {
            Ok(frag) => frag,
            Err(e) => {
                unsafe { epoxy::DeleteShader(vert) };
                return Err(e);
            }
        };

        let attribute = CString::new(POSITION_ATTRIBUTE).unwrap_or_default();
        let mut ok = 0i32;
        let program = unsafe {
            let program = epoxy::CreateProgram();
            epoxy::AttachShader(program, vert);
            epoxy::AttachShader(program, frag);
            epoxy::BindAttribLocation(program, 0, attribute.as_ptr());
            epoxy::LinkProgram(program);
            epoxy::GetProgramiv(program, epoxy::LINK_STATUS, &raw mut ok);

            epoxy::DetachShader(program, vert);
            epoxy::DetachShader(program, frag);
            epoxy::DeleteShader(vert);
            epoxy::DeleteShader(frag);
            program
        };

        if ok == 0 {
            let log = Self::info_log(program, program_iv, program_log);
            unsafe { epoxy::DeleteProgram(program) };
            return Err(ShaderError::Link { log });
        }
        Ok(ProgramId(program))
    }

    fn delete_program(&mut self, program: ProgramId) {
        unsafe { epoxy::DeleteProgram(program.0) };
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name).ok()?;
        let location = unsafe { epoxy::GetUniformLocation(program.0, name.as_ptr()) };
        (location >= 0).then_some(UniformLocation(location))
    }

    fn shading_language_version(&mut self) -> String {
        let raw = unsafe { epoxy::GetString(epoxy::SHADING_LANGUAGE_VERSION) };
        if raw.is_null() {
            return String::new();
        }
        unsafe { CStr::from_ptr(raw.cast()) }
            .to_string_lossy()
            .into_owned()
    }

    fn upload_quad(&mut self, vertices: &[f32]) -> QuadMesh {
        let mut vao = 0u32;
        let mut vbo = 0u32;
        unsafe {
            epoxy::GenVertexArrays(1, &raw mut vao);
            epoxy::GenBuffers(1, &raw mut vbo);

            epoxy::BindVertexArray(vao);
            epoxy::BindBuffer(epoxy::ARRAY_BUFFER, vbo);
            epoxy::BufferData(
                epoxy::ARRAY_BUFFER,
                mem::size_of_val(vertices) as isize,
                vertices.as_ptr().cast::<c_void>(),
                epoxy::STATIC_DRAW,
            );

            // groups of 3 floats, tightly packed
            epoxy::VertexAttribPointer(
                0,
                3,
                epoxy::FLOAT,
                epoxy::FALSE,
                3 * mem::size_of::<f32>() as i32,
                ptr::null(),
            );
            epoxy::EnableVertexAttribArray(0);

            epoxy::BindVertexArray(0);
            epoxy::BindBuffer(epoxy::ARRAY_BUFFER, 0);
        }

        QuadMesh {
            vao,
            vbo,
            vertex_count: (vertices.len() / 3) as i32,
        }
    }

    fn delete_quad(&mut self, mesh: QuadMesh) {
        unsafe {
            epoxy::DeleteBuffers(1, &raw const mesh.vbo);
            epoxy::DeleteVertexArrays(1, &raw const mesh.vao);
        }
    }

    fn enable_alpha_blending(&mut self) {
        unsafe {
            epoxy::Enable(epoxy::BLEND);
            epoxy::BlendFunc(epoxy::SRC_ALPHA, epoxy::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn viewport(&mut self, width: i32, height: i32) {
        unsafe { epoxy::Viewport(0, 0, width, height) };
    }

    fn clear(&mut self, color: [f32; 3]) {
        unsafe {
            epoxy::ClearColor(color[0], color[1], color[2], 1.0);
            epoxy::Clear(epoxy::COLOR_BUFFER_BIT);
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        unsafe { epoxy::UseProgram(program.0) };
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let location = location.0;
        unsafe {
            match value {
                UniformValue::Float(v) => epoxy::Uniform1f(location, v),
                UniformValue::Vec2(v) => epoxy::Uniform2f(location, v[0], v[1]),
                UniformValue::Vec3(v) => epoxy::Uniform3f(location, v[0], v[1], v[2]),
            }
        }
    }

    fn draw_triangles(&mut self, mesh: &QuadMesh) {
        unsafe {
            epoxy::BindVertexArray(mesh.vao);
            epoxy::DrawArrays(epoxy::TRIANGLES, 0, mesh.vertex_count);
            epoxy::BindVertexArray(0);
        }
    }
}
