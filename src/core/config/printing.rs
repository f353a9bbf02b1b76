use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match self.toast_limit {
            Some(limit) => println!("  toast-limit: {limit}"),
            None => println!("  toast-limit: (unset, {})", self.effective_toast_limit()),
        }
        match self.toast_remove_delay_ms {
            Some(delay) => println!("  toast-remove-delay-ms: {delay}"),
            None => println!(
                "  toast-remove-delay-ms: (unset, {})",
                self.effective_remove_delay().as_millis()
            ),
        }
        match &self.log_filter {
            Some(filter) => println!("  log-filter: {filter}"),
            None => println!("  log-filter: (unset, {})", self.effective_log_filter()),
        }
    }
}
