use std::path::Path;
use std::thread;
use std::time::Duration;

use tevlink_client::Client;
use tevlink_frame::{Color, Pos, Size, VgCommand, Winding};
use tracing::warn;

use crate::cmd::{DemoArgs, Globals};
use crate::exit::{io_error, CliResult, FAILURE, SUCCESS};
use crate::image::TestImage;

/// Runs every command once against a live viewer, reporting each step.
///
/// Individual step failures are reported and the walkthrough continues; the exit
/// code is non-zero if any step failed.
pub fn run(args: DemoArgs, globals: &Globals) -> CliResult<i32> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(|err| io_error("current directory", err))?,
    };
    std::fs::create_dir_all(&dir)
        .map_err(|err| io_error(&format!("create {}", dir.display()), err))?;
    let first = dir.join("test1.pfm");
    let second = dir.join("test2.pfm");
    write(&TestImage::checkerboard(128, 128), &first)?;
    write(&TestImage::checkerboard(256, 256), &second)?;

    let pause = || thread::sleep(Duration::from_millis(args.pause_ms));
    let mut walk = Walk::default();

    println!("Connecting to {}:{}", globals.config.host, globals.config.port);
    let mut client = globals.connect()?;

    let first_name = display(&first);
    let second_name = display(&second);

    println!("Open image from {first_name}");
    walk.step(&mut client, |c| c.open_image(&first_name, "", true));
    pause();

    println!("Open image from {second_name}");
    walk.step(&mut client, |c| c.open_image(&second_name, "", true));
    pause();

    write(&TestImage::uv_gradient(512, 128), &first)?;
    println!("Reload image {first_name}");
    walk.step(&mut client, |c| c.reload_image(&first_name, true));
    pause();

    println!("Close image {first_name}");
    walk.step(&mut client, |c| c.close_image(&first_name));
    pause();

    println!("Create image test3");
    let test3 = TestImage::uv_gradient(2048, 1024);
    walk.step(&mut client, |c| {
        c.create_image_with_data::<&str>(
            "test3",
            test3.width,
            test3.height,
            test3.channels,
            None,
            &test3.data,
            true,
        )
    });
    pause();

    println!("Draw overlay on test3");
    let shapes = overlay(test3.width as f32, test3.height as f32);
    walk.step(&mut client, |c| c.vector_graphics("test3", &shapes, false, true));

    println!("Disconnecting");
    walk.step(&mut client, |c| c.disconnect());

    Ok(if walk.failures == 0 { SUCCESS } else { FAILURE })
}

#[derive(Default)]
struct Walk {
    failures: usize,
}

impl Walk {
    fn step<F>(&mut self, client: &mut Client, op: F)
    where
        F: FnOnce(&mut Client) -> tevlink_client::Result<()>,
    {
        if let Err(err) = op(client) {
            warn!(error = %err, kind = %err.kind(), "demo step failed");
            self.failures += 1;
            println!("Failed: {}", client.last_error_message());
        }
    }
}

fn write(image: &TestImage, path: &Path) -> CliResult<()> {
    image
        .write_pfm(path)
        .map_err(|err| io_error(&format!("write {}", path.display()), err))
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// A framed, crossed-out region with a circle in the middle.
fn overlay(width: f32, height: f32) -> Vec<VgCommand> {
    let inset = 32.0;
    vec![
        VgCommand::save(),
        VgCommand::stroke_color(Color::rgb(1.0, 1.0, 1.0)),
        VgCommand::begin_path(),
        VgCommand::rounded_rect(
            Pos::new(inset, inset),
            Size::new(width - 2.0 * inset, height - 2.0 * inset),
            16.0,
        ),
        VgCommand::stroke(),
        VgCommand::begin_path(),
        VgCommand::move_to(Pos::new(inset, inset)),
        VgCommand::line_to(Pos::new(width - inset, height - inset)),
        VgCommand::move_to(Pos::new(width - inset, inset)),
        VgCommand::line_to(Pos::new(inset, height - inset)),
        VgCommand::stroke(),
        VgCommand::fill_color(Color::rgba(1.0, 0.5, 0.0, 0.5)),
        VgCommand::begin_path(),
        VgCommand::arc(
            Pos::new(width / 2.0, height / 2.0),
            height / 4.0,
            0.0,
            std::f32::consts::TAU,
            Winding::Clockwise,
        ),
        VgCommand::fill(),
        VgCommand::restore(),
    ]
}
