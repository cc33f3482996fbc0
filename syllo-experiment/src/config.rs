use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub screen_size: (u32, u32),
    pub max_participants: u32,
    /// Reserved pacing constant before the instructions; not used by the state machine.
    pub start_delay: Duration,
    pub images_root: PathBuf,
    pub instructions_image: PathBuf,
    pub records_path: PathBuf,
    pub trial_log_dir: Option<PathBuf>,
    /// Character index of the phase/truth tag in stimulus filenames.
    pub tag_offset: usize,
    /// 1-based positions in the practice test that need a judgment key.
    pub test_judged_items: Vec<usize>,
    /// How long a conclusion image stays on screen after its first display.
    pub conclusion_display: Duration,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            screen_size: (800, 600),
            max_participants: 20,
            start_delay: Duration::from_secs(1),
            images_root: PathBuf::from("Images"),
            instructions_image: PathBuf::from("InstructionImage.png"),
            records_path: PathBuf::from("SolvingSyllogisms.csv"),
            trial_log_dir: None,
            tag_offset: 3,
            test_judged_items: vec![5, 7],
            conclusion_display: Duration::from_secs(7),
        }
    }
}

impl ExperimentConfig {
    pub fn is_judged_test_item(&self, position: usize) -> bool {
        self.test_judged_items.contains(&position)
    }
}
