pub mod render_config;
pub mod renderer;
pub mod shader;
pub mod vertex;
