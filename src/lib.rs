pub mod app;
pub mod canvas;
pub mod config;
pub mod input;
pub mod model;
pub mod physics;
pub mod raster;
pub mod render;

pub use app::{run, FramePacer, Pacer, RunSummary, Simulation};
pub use canvas::{Canvas, Fill};
pub use config::{Config, Preset, RunLength};
pub use input::{Command, InputSource, TerminalInput};
pub use model::{Arena, Body, Collider, Vec2};
pub use physics::{Contact, Physics, SideBounce};
pub use raster::{oval_strength, rasterize, DiscShape};
pub use render::{RenderOptions, Renderer, TerminalRenderer};
