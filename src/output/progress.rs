use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Spinners for the three waiting phases of a run. Drawn on stderr so they
/// never mix with the workflow commands on stdout.
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start_phase_1(job: &str) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        let pb = create_spinner(
            bright_yellow(format!("Phase 1/3: Waiting for {job} to leave the queue")).to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_1_start_phase_2(self, build: u64) -> Self {
        self.pb.finish_with_message(
            bright_green(format!("Phase 1/3: Scheduled as build #{build} ✓")).to_string(),
        );
        let pb = create_spinner(
            bright_yellow(format!("Phase 2/3: Waiting for build #{build} to finish")).to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_2_start_phase_3(self, result: &str) -> Self {
        self.pb
            .finish_with_message(bright_green(format!("Phase 2/3: Finished with {result} ✓")).to_string());
        let pb = create_spinner(bright_yellow("Phase 3/3: Fetching build log").to_string());
        Self { pb }
    }

    pub fn finish_phase_3(self) {
        self.pb
            .finish_with_message(bright_green("Phase 3/3: Build log fetched ✓").to_string());
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
