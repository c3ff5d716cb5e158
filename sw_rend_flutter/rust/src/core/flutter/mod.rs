pub mod pixel_texture;
