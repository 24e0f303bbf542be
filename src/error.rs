//! Error type shared by the portable core and the WebGL binding.

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("Tessellation error: {0}")]
    Tessellation(String),

    #[error("Outline {0} has fewer than three distinct points")]
    DegenerateOutline(&'static str),

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("Program link error: {0}")]
    ProgramLink(String),

    #[error("Context error: {0}")]
    Context(String),

    #[error("Allocation error: {0}")]
    Allocation(&'static str),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl SceneError {
    pub fn tessellation<T: ToString>(msg: T) -> Self {
        SceneError::Tessellation(msg.to_string())
    }

    pub fn context<T: ToString>(msg: T) -> Self {
        SceneError::Context(msg.to_string())
    }

    pub fn dom<T: ToString>(msg: T) -> Self {
        SceneError::Dom(msg.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SceneError> for wasm_bindgen::JsValue {
    fn from(err: SceneError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
