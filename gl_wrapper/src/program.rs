use gl::types::{GLenum, GLuint};
use std::ffi::{c_char, CString};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Upper bound on bytes read back from a shader or program info log.
pub const INFO_LOG_CAPACITY: usize = 512;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    /// Compiles both stages and links them into one program.
    ///
    /// Shader objects are detached and deleted once linking finished, whatever the outcome.
    pub fn build(self) -> Result<Program, PBError> {
        let vert_src = CString::new(self.vert).map_err(|_| PBError::InvalidSource(ShaderStage::Vertex))?;
        let frag_src =
            CString::new(self.frag).map_err(|_| PBError::InvalidSource(ShaderStage::Fragment))?;

        let vert = Shader::compile(ShaderStage::Vertex, &vert_src)?;
        let frag = Shader::compile(ShaderStage::Fragment, &frag_src)?;

        let program = Program {
            id: unsafe { gl::CreateProgram() },
        };

        let linked = unsafe {
            gl::AttachShader(program.id, vert.id);
            gl::AttachShader(program.id, frag.id);
            gl::LinkProgram(program.id);

            let mut success = 0;
            gl::GetProgramiv(program.id, gl::LINK_STATUS, (&mut success) as *mut i32);

            gl::DetachShader(program.id, vert.id);
            gl::DetachShader(program.id, frag.id);

            success == gl::TRUE as i32
        };

        if !linked {
            let log = read_info_log(|len, buf| unsafe {
                gl::GetProgramInfoLog(program.id, len, std::ptr::null_mut(), buf)
            });

            return Err(PBError::Linking(log));
        }

        Ok(program)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(&self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{0} shader source contains a NUL byte")]
    InvalidSource(ShaderStage),
    #[error("{stage} shader compilation failed:\n{log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("program linking failed:\n{0}")]
    Linking(String),
}

struct Shader {
    id: GLuint,
}

impl Shader {
    fn compile(stage: ShaderStage, src: &CString) -> Result<Self, PBError> {
        let shader = Shader {
            id: unsafe { gl::CreateShader(stage.gl_kind()) },
        };

        let mut success = 0;

        unsafe {
            gl::ShaderSource(
                shader.id,
                1,
                (&src.as_ptr()) as *const *const c_char,
                std::ptr::null(),
            );

            gl::CompileShader(shader.id);
            gl::GetShaderiv(shader.id, gl::COMPILE_STATUS, (&mut success) as *mut i32);
        }

        if success != gl::TRUE as i32 {
            let log = read_info_log(|len, buf| unsafe {
                gl::GetShaderInfoLog(shader.id, len, std::ptr::null_mut(), buf)
            });

            return Err(PBError::Compilation { stage, log });
        }

        Ok(shader)
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) }
    }
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

fn read_info_log(fetch: impl FnOnce(i32, *mut c_char)) -> String {
    let mut buf = [0_u8; INFO_LOG_CAPACITY];

    fetch(INFO_LOG_CAPACITY as i32, buf.as_mut_ptr() as *mut c_char);

    info_log_to_string(&buf)
}

/// Text up to the first NUL, or the whole buffer when the driver filled it.
fn info_log_to_string(buf: &[u8]) -> String {
    let data = match buf.iter().position(|b| *b == 0) {
        Some(end) => &buf[..end],
        None => buf,
    };

    let log = String::from_utf8_lossy(data).trim_end().to_string();

    if log.is_empty() {
        "<no info log>".to_string()
    } else {
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_stops_at_nul() {
        let mut buf = [0_u8; INFO_LOG_CAPACITY];
        let msg = b"0:1(1): error: syntax error\n";
        buf[..msg.len()].copy_from_slice(msg);
        buf[msg.len() + 1] = b'x';

        assert_eq!(info_log_to_string(&buf), "0:1(1): error: syntax error");
    }

    #[test]
    fn full_log_is_truncated_to_capacity() {
        let buf = [b'e'; INFO_LOG_CAPACITY];

        let log = info_log_to_string(&buf);

        assert_eq!(log.len(), INFO_LOG_CAPACITY);
    }

    #[test]
    fn empty_log_is_never_blank() {
        let buf = [0_u8; INFO_LOG_CAPACITY];

        assert_eq!(info_log_to_string(&buf), "<no info log>");
    }

    #[test]
    fn read_info_log_passes_capacity() {
        let mut seen = 0;

        let log = read_info_log(|len, buf| {
            seen = len;
            unsafe { *buf = b'!' as c_char };
        });

        assert_eq!(seen, INFO_LOG_CAPACITY as i32);
        assert_eq!(log, "!");
    }

    #[test]
    fn errors_name_the_failing_stage() {
        let err = PBError::Compilation {
            stage: ShaderStage::Fragment,
            log: "0:3(5): error: `FragColr' undeclared".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.starts_with("fragment shader compilation failed"));
        assert!(msg.contains("FragColr"));
    }

    #[test]
    fn nul_in_source_is_rejected_before_gl() {
        let res = ProgramBuilder::new("void main() {}\0", "void main() {}").build();

        assert!(matches!(
            res,
            Err(PBError::InvalidSource(ShaderStage::Vertex))
        ));
    }
}
