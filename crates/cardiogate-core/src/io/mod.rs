pub mod frame_dir;
pub mod image_io;

pub use frame_dir::FrameDirectory;
pub use image_io::load_image;
