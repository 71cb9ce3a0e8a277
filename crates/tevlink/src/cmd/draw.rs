use tevlink_frame::{Pos, Size, VgCommand};

use crate::cmd::{DrawArgs, Globals};
use crate::exit::{client_error, CliError, CliResult, SUCCESS};

pub fn run(args: DrawArgs, globals: &Globals) -> CliResult<i32> {
    let commands = build_commands(&args);
    if commands.is_empty() && !args.replace {
        return Err(CliError::usage(
            "nothing to draw: pass --line, --rect or --circle (or --replace to clear)",
        ));
    }

    let mut client = globals.connect()?;
    client
        .vector_graphics(&args.name, &commands, !args.replace, !args.no_focus)
        .map_err(|err| client_error("draw failed", err))?;
    Ok(SUCCESS)
}

/// Lines are stroked; rects and circles are filled when a fill color is set.
fn build_commands(args: &DrawArgs) -> Vec<VgCommand> {
    let shapes = args.line.len() + args.rect.len() + args.circle.len();
    if shapes == 0 {
        return Vec::new();
    }

    let mut commands = vec![VgCommand::save()];
    if let Some(color) = args.stroke_color {
        commands.push(VgCommand::stroke_color(color));
    }
    if let Some(color) = args.fill_color {
        commands.push(VgCommand::fill_color(color));
    }
    let close = if args.fill_color.is_some() {
        VgCommand::fill()
    } else {
        VgCommand::stroke()
    };

    for [x0, y0, x1, y1] in &args.line {
        commands.extend([
            VgCommand::begin_path(),
            VgCommand::move_to(Pos::new(*x0, *y0)),
            VgCommand::line_to(Pos::new(*x1, *y1)),
            VgCommand::stroke(),
        ]);
    }
    for [x, y, w, h] in &args.rect {
        commands.extend([
            VgCommand::begin_path(),
            VgCommand::rect(Pos::new(*x, *y), Size::new(*w, *h)),
            close,
        ]);
    }
    for [x, y, r] in &args.circle {
        commands.extend([
            VgCommand::begin_path(),
            VgCommand::circle(Pos::new(*x, *y), *r),
            close,
        ]);
    }
    commands.push(VgCommand::restore());
    commands
}
