//! Handling the LUMOS CLI
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version information, etc.).
use std::path::PathBuf;

use clap::{builder::Str, Parser};

use crate::{analyzers::RayTraceConfig, error::LumosResult, get_version};

/// Command line arguments for the LUMOS application.
#[derive(Parser, Debug)]
#[command(author, version = Str::from(&get_version()), about, long_about = None)]
pub struct Args {
    /// filepath of the scene (YAML) to read in
    #[arg(short, long)]
    pub file_path: PathBuf,

    /// maximum number of bounces per ray lineage. Overrides the value of the scene file.
    #[arg(short = 'b', long)]
    pub max_bounces: Option<usize>,

    /// maximum number of rays per trace pass. Overrides the value of the scene file.
    #[arg(short = 'r', long)]
    pub max_rays: Option<usize>,

    /// destination file of the detector readouts (YAML). If not given, the readouts are only printed.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
impl Args {
    /// Apply the command line overrides to the given [`RayTraceConfig`].
    ///
    /// # Errors
    ///
    /// This function will return an error if an override value is invalid (e.g. zero rays per pass).
    pub fn apply_to(&self, config: &mut RayTraceConfig) -> LumosResult<()> {
        if let Some(max_bounces) = self.max_bounces {
            config.set_max_number_of_bounces(max_bounces);
        }
        if let Some(max_rays) = self.max_rays {
            config.set_max_rays_per_pass(max_rays)?;
        }
        Ok(())
    }
}

fn create_intro() -> String {
    let mut intro = String::new();
    intro += &format!("{:-^60}\n", "");
    intro += &format!("{: ^60}\n", "L U M O S");
    intro += &format!("{: ^60}\n", "2D optical ray tracing");
    intro += &format!("{:-^60}\n", "");
    intro
}
/// Print the intro banner including the version information
pub fn show_intro() {
    let intro = create_intro();
    let version_str = format!("{: ^60}\n", "version ".to_owned() + &get_version());
    println!("{intro}{version_str}");
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn intro() {
        let intro = create_intro();
        assert_eq!(intro.lines().count(), 4);
        assert!(intro.contains("L U M O S"));
    }
    #[test]
    fn parse_minimal() {
        let args = Args::try_parse_from(["lumos", "-f", "scene.yaml"]).unwrap();
        assert_eq!(args.file_path, PathBuf::from("scene.yaml"));
        assert!(args.max_bounces.is_none());
        assert!(args.max_rays.is_none());
        assert!(args.output.is_none());
    }
    #[test]
    fn parse_all() {
        let args = Args::try_parse_from([
            "lumos",
            "--file-path",
            "scene.yaml",
            "-b",
            "5",
            "-r",
            "100",
            "-o",
            "readout.yaml",
        ])
        .unwrap();
        assert_eq!(args.max_bounces, Some(5));
        assert_eq!(args.max_rays, Some(100));
        assert_eq!(args.output, Some(PathBuf::from("readout.yaml")));
    }
    #[test]
    fn parse_wrong() {
        assert!(Args::try_parse_from(["lumos"]).is_err());
        assert!(Args::try_parse_from(["lumos", "-f", "scene.yaml", "-b", "x"]).is_err());
    }
    #[test]
    fn apply_overrides() {
        let mut config = RayTraceConfig::default();
        let args = Args::try_parse_from(["lumos", "-f", "s.yaml", "-b", "3", "-r", "50"]).unwrap();
        args.apply_to(&mut config).unwrap();
        assert_eq!(config.max_number_of_bounces(), 3);
        assert_eq!(config.max_rays_per_pass(), 50);
        let args = Args::try_parse_from(["lumos", "-f", "s.yaml", "-r", "0"]).unwrap();
        assert!(args.apply_to(&mut config).is_err());
        assert_eq!(config.max_rays_per_pass(), 50);
    }
}
