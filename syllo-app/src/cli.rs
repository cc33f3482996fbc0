use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use syllo_experiment::ExperimentConfig;

/// Syllogism validity judgments with reaction-time scoring.
#[derive(Parser, Debug)]
#[command(name = "syllogisms", version, about)]
pub struct Args {
    /// Window width in pixels.
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Window height in pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Highest accepted participant id.
    #[arg(long, default_value_t = 20)]
    pub max_participants: u32,

    /// Reserved delay before the instructions (e.g. "1s").
    #[arg(long, value_parser = humantime::parse_duration, default_value = "1s")]
    pub start_delay: Duration,

    /// Root of the stimulus image tree.
    #[arg(long, default_value = "Images")]
    pub images: PathBuf,

    /// Instruction screen image.
    #[arg(long, default_value = "InstructionImage.png")]
    pub instructions: PathBuf,

    /// CSV file session records are appended to.
    #[arg(long, env = "SYLLOGISMS_RECORDS", default_value = "SolvingSyllogisms.csv")]
    pub records: PathBuf,

    /// Also write a per-conclusion JSON log into this directory.
    #[arg(long)]
    pub trial_log_dir: Option<PathBuf>,

    /// Character index of the phase tag in stimulus filenames.
    #[arg(long, default_value_t = 3)]
    pub tag_offset: usize,

    /// 1-based practice positions that need a judgment key.
    #[arg(long, value_delimiter = ',', default_values_t = [5, 7])]
    pub judged: Vec<usize>,

    /// How long a conclusion image stays visible.
    #[arg(long, value_parser = humantime::parse_duration, default_value = "7s")]
    pub conclusion_display: Duration,

    /// TrueType font used for all text.
    #[arg(long, default_value = "assets/DejaVuSans.ttf")]
    pub font: PathBuf,

    /// Borderless fullscreen on the primary monitor.
    #[arg(long)]
    pub fullscreen: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn experiment_config(&self) -> ExperimentConfig {
        ExperimentConfig {
            screen_size: (self.width, self.height),
            max_participants: self.max_participants,
            start_delay: self.start_delay,
            images_root: self.images.clone(),
            instructions_image: self.instructions.clone(),
            records_path: self.records.clone(),
            trial_log_dir: self.trial_log_dir.clone(),
            tag_offset: self.tag_offset,
            test_judged_items: self.judged.clone(),
            conclusion_display: self.conclusion_display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_experiment_defaults() {
        let args = Args::try_parse_from(["syllogisms"]).unwrap();
        let config = args.experiment_config();
        let expected = ExperimentConfig::default();
        assert_eq!(config.screen_size, expected.screen_size);
        assert_eq!(config.max_participants, expected.max_participants);
        assert_eq!(config.start_delay, expected.start_delay);
        assert_eq!(config.tag_offset, expected.tag_offset);
        assert_eq!(config.test_judged_items, expected.test_judged_items);
        assert_eq!(config.conclusion_display, expected.conclusion_display);
        assert_eq!(config.trial_log_dir, None);
        assert!(!args.fullscreen);
    }

    #[test]
    fn overrides_are_applied() {
        let args = Args::try_parse_from([
            "syllogisms",
            "--judged",
            "2,4",
            "--conclusion-display",
            "1500ms",
            "--max-participants",
            "40",
            "-vv",
        ])
        .unwrap();
        let config = args.experiment_config();
        assert_eq!(config.test_judged_items, vec![2, 4]);
        assert_eq!(config.conclusion_display, Duration::from_millis(1500));
        assert_eq!(config.max_participants, 40);
        assert_eq!(args.verbose, 2);
    }
}
