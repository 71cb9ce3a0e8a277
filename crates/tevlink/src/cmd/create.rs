use tracing::info;

use crate::cmd::{CreateArgs, Globals, Pattern};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::image::TestImage;

pub fn run(args: CreateArgs, globals: &Globals) -> CliResult<i32> {
    let count = args
        .channel_names
        .as_ref()
        .map_or(args.channels, Vec::len);
    let grab_focus = !args.no_focus;
    let mut client = globals.connect()?;

    if args.pattern == Pattern::None {
        client
            .create_image(
                &args.name,
                args.width,
                args.height,
                count,
                args.channel_names.as_deref(),
                grab_focus,
            )
            .map_err(|err| client_error("create failed", err))?;
        return Ok(SUCCESS);
    }

    let data = pattern_data(args.pattern, args.width, args.height, count);
    client
        .create_image_with_data(
            &args.name,
            args.width,
            args.height,
            count,
            args.channel_names.as_deref(),
            &data,
            grab_focus,
        )
        .map_err(|err| client_error("create failed", err))?;
    info!(image = %args.name, floats = data.len(), "image created and filled");
    Ok(SUCCESS)
}

/// Interleave `pattern` over `channels` channels.
fn pattern_data(pattern: Pattern, width: u32, height: u32, channels: usize) -> Vec<f32> {
    match pattern {
        Pattern::None => Vec::new(),
        Pattern::Checkerboard => TestImage::checkerboard(width, height)
            .data
            .into_iter()
            .flat_map(|value| std::iter::repeat_n(value, channels))
            .collect(),
        Pattern::Gradient => {
            let rgb = TestImage::uv_gradient(width, height);
            rgb.data
                .chunks_exact(rgb.channels)
                .flat_map(|pixel| (0..channels).map(move |c| pixel.get(c).copied().unwrap_or(0.0)))
                .collect()
        }
    }
}
