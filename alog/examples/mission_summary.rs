//! Prints a short summary of an alog file and the distance travelled.
//!
//! Run with: `cargo run -p alog --example mission_summary -- path/to/mission.alog`

use alog::options::ParseOptions;
use alog::store::SeriesStore;
use alog::transform;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: mission_summary <file.alog>")?;

    let options = ParseOptions::default().with_include(["NAV_X", "NAV_Y", "NAV_SPEED"]);
    let store = SeriesStore::open(&path, &options)?;

    println!("=== {path} ===");
    println!("Start:    {:.2}", store.start_time());
    println!("End:      {:.2}", store.end_time());
    println!("Duration: {:.2}s", store.duration());
    println!();

    for summary in store.summary() {
        println!(
            "  {:<12} {:>8} records  last={}",
            summary.name, summary.count, summary.last_value
        );
    }

    if store.contains("NAV_SPEED") {
        let odometer = store.timed_plot_series("NAV_SPEED", Some(&transform::integrate))?;
        if let Some(total) = odometer.values.last() {
            println!();
            println!("Summed speed samples: {total:.1}");
        }
    }

    if store.contains("NAV_X") && store.contains("NAV_Y") {
        let range = store.combined_plot_series(&["NAV_X", "NAV_Y"], |v| v[0].hypot(v[1]))?;
        let max = range.values.iter().copied().fold(0.0_f64, f64::max);
        println!("Max range from origin: {max:.1}");
    }

    Ok(())
}
