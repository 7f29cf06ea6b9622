mod app;
mod assets;
mod config;
mod headless;
mod render;

use clap::Parser;
use octa::{ColorScheme, NormalAveraging, OctahedronOptions, Rgba, Shading};
use winit::event_loop::EventLoop;

use config::ViewerConfig;

#[derive(Parser)]
#[command(name = "viewer")]
#[command(about = "Regular octahedron with flat and smooth shading")]
struct Args {
    #[arg(long, value_parser = parse_color, help = "Uniform color for every face, as r,g,b,a")]
    color: Option<Rgba>,

    #[arg(long, help = "Start with smooth (vertex normal) shading")]
    smooth: bool,

    #[arg(long, help = "Scale averaged vertex normals back to unit length")]
    renormalize: bool,

    #[arg(long, help = "Run against an in-memory surface and print the command log")]
    headless: bool,

    #[arg(long, value_name = "SECONDS", help = "Print the orbit rig transforms at this time")]
    orbit: Option<f32>,

    #[arg(
        long,
        value_name = "CX,CY,RX,RY,AX,AY,BX,BY",
        value_parser = parse_floats::<8>,
        help = "Intersect segment A..B with the circle centered at C through R"
    )]
    intersect: Option<[f32; 8]>,
}

impl Args {
    fn mesh_options(&self) -> OctahedronOptions {
        OctahedronOptions {
            colors: ColorScheme::from(self.color),
            shading: if self.smooth {
                Shading::Smooth
            } else {
                Shading::Flat
            },
            averaging: if self.renormalize {
                NormalAveraging::Renormalized
            } else {
                NormalAveraging::Mean
            },
        }
    }
}

fn parse_color(s: &str) -> Result<Rgba, String> {
    parse_floats::<4>(s)
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    parts
        .try_into()
        .map_err(|parts: Vec<f32>| format!("expected {} components, got {}", N, parts.len()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = args.mesh_options();

    if let Some(seconds) = args.orbit {
        headless::print_orbit(seconds);
        return Ok(());
    }
    if let Some(values) = args.intersect {
        headless::print_intersections(values);
        return Ok(());
    }
    if args.headless {
        let commands = headless::run(options)?;
        headless::print(&commands);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = app::App::new(ViewerConfig::default(), options);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("0, 1, 0, 1"), Ok([0.0, 1.0, 0.0, 1.0]));
        assert!(parse_color("1,0,0").is_err());
        assert!(parse_color("red").is_err());
        assert_eq!(parse_floats::<2>("0.5,-1"), Ok([0.5, -1.0]));
    }

    #[test]
    fn test_dump_flags() {
        let args =
            Args::parse_from(["viewer", "--orbit", "1.5", "--intersect", "0,0,1,0,-2,0,2,0"]);
        assert_eq!(args.orbit, Some(1.5));
        assert_eq!(args.intersect, Some([0.0, 0.0, 1.0, 0.0, -2.0, 0.0, 2.0, 0.0]));
        assert!(Args::try_parse_from(["viewer", "--intersect", "0,0,1"]).is_err());
    }

    #[test]
    fn test_args_to_options() {
        let args = Args::parse_from(["viewer", "--color", "0,1,0,1", "--smooth", "--renormalize"]);
        let options = args.mesh_options();
        assert_eq!(options.colors, ColorScheme::Uniform([0.0, 1.0, 0.0, 1.0]));
        assert_eq!(options.shading, Shading::Smooth);
        assert_eq!(options.averaging, NormalAveraging::Renormalized);

        let defaults = Args::parse_from(["viewer"]).mesh_options();
        assert_eq!(defaults, OctahedronOptions::default());
    }
}
