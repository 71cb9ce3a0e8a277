//! Stream an animated gradient into a running tev instance and annotate it.
//!
//! Run tev first, then: `cargo run --example gradient-overlay`

use std::thread;
use std::time::Duration;

use tevlink::client::{Client, ClientConfig};
use tevlink::frame::{ChannelDescriptor, Color, ImageRegion, Pos, Size, VgCommand};

const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;
const TILE: u32 = 64;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut tev = Client::connect_to(&ClientConfig::default())?;
    tev.create_image::<&str>("gradient", WIDTH, HEIGHT, 3, None, true)?;

    // Planar tiles: all of R, then all of G, then all of B.
    let pixels = (TILE * TILE) as usize;
    let channels = [
        ChannelDescriptor::new("R", 0, 1),
        ChannelDescriptor::new("G", pixels as i64, 1),
        ChannelDescriptor::new("B", 2 * pixels as i64, 1),
    ];

    for ty in 0..HEIGHT / TILE {
        for tx in 0..WIDTH / TILE {
            let mut data = vec![0.0f32; 3 * pixels];
            for y in 0..TILE {
                for x in 0..TILE {
                    let i = (y * TILE + x) as usize;
                    data[i] = (tx * TILE + x) as f32 / WIDTH as f32;
                    data[pixels + i] = (ty * TILE + y) as f32 / HEIGHT as f32;
                    data[2 * pixels + i] = 0.25;
                }
            }
            let region = ImageRegion::new(tx * TILE, ty * TILE, TILE, TILE);
            tev.update_image_strided("gradient", region, &channels, &data, false)?;
            thread::sleep(Duration::from_millis(20));
        }
    }

    let outline = [
        VgCommand::save(),
        VgCommand::stroke_color(Color::rgb(1.0, 1.0, 1.0)),
        VgCommand::begin_path(),
        VgCommand::rect(Pos::new(8.0, 8.0), Size::new(240.0, 240.0)),
        VgCommand::stroke(),
        VgCommand::restore(),
    ];
    tev.vector_graphics("gradient", &outline, false, false)?;
    Ok(())
}
