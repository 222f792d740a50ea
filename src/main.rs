//! rStatbook main entrypoint.

use rstatbook::run;
use rstatbook::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
