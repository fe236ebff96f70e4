//! The command-line interface
use clap::Parser;
use std::path::PathBuf;

/// Render hill-shaded waterfall images from Kongsberg .all files
#[derive(Parser, Debug)]
#[command(name = "hsw", version, arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Action,
}

#[derive(clap::Subcommand, Debug)]
pub enum Action {
    /// Write a PNG waterfall next to each input file
    Waterfall {
        /// Input files or glob patterns, e.g. "*.all"
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Shade scale factor; smaller values give less shade
        #[arg(short, long, default_value_t = 1.0)]
        shade_scale: f64,
        /// Rotate the image so it reads left to right instead of bottom to top
        #[arg(short, long)]
        rotate: bool,
        /// Shade in gray instead of coloring by depth
        #[arg(long)]
        gray: bool,
        /// Output pixels per beam across track
        #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
        zoom: u16,
        /// Palette file; the bundled palette is used otherwise
        #[arg(short, long)]
        palette: Option<PathBuf>,
        /// Stop at the first file that fails
        #[arg(long)]
        fail_fast: bool,
    },
    /// Print the estimated resolution of a file
    Info {
        path: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(args: Args) -> crate::Result<()> {
    match args.cmd {
        Action::Waterfall {
            inputs,
            shade_scale,
            rotate,
            gray,
            zoom,
            palette,
            fail_fast,
        } => {
            let options = crate::waterfall::WaterfallOptions {
                shade_scale,
                rotate,
                zoom: usize::from(zoom),
            };
            let settings = waterfall::Settings {
                options,
                gray,
                palette,
                fail_fast,
            };
            waterfall::waterfall(&inputs, &settings)?;
        }
        Action::Info { path, json } => {
            info::info(path, json)?;
        }
    };
    Ok(())
}

pub mod info;
pub mod waterfall;
