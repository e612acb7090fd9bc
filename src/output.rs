//! This module is in charge of outputting the final emulation results to the
//! standard output and to disk

use crate::{
    config::Configuration,
    numeric::{reals, Float},
    tally::{TriggerSummary, LINE_NAMES},
    Result,
};

use eyre::WrapErr;
use time::{macros::format_description, OffsetDateTime};

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    time::Duration,
};

// Number of significant digits in file output
const SIG_DIGITS: usize = (reals::DIGITS - 1) as usize;

/// Output the emulation results to the console and to disk
pub fn dump_results(
    cfg: &Configuration,
    summary: &TriggerSummary,
    elapsed_time: Duration,
) -> Result<()> {
    // Print out per-line efficiencies on stdout
    print_summary(summary);

    // Compute a timestamp of when the run ended
    let timestamp = OffsetDateTime::now_utc()
        .format(format_description!(
            "[day]-[month repr:short]-[year repr:last_two]   [hour]:[minute]:[second]"
        ))
        .wrap_err("Failed to format the run timestamp")?;

    let file = File::create(&cfg.output)
        .wrap_err_with(|| format!("Failed to create {}", cfg.output.display()))?;
    let mut writer = BufWriter::new(file);
    write_results(&mut writer, cfg, summary, &timestamp, elapsed_time)
        .and_then(|()| writer.flush())
        .wrap_err_with(|| format!("Failed to write {}", cfg.output.display()))?;

    tracing::info!(output = %cfg.output.display(), "Results written");
    Ok(())
}

/// Display per-line efficiencies in human-readable form
pub fn print_summary(summary: &TriggerSummary) {
    println!();
    println!("Candidates     : {}", summary.decisions.len());
    for (name, eff) in LINE_NAMES.iter().zip(summary.efficiencies.iter()) {
        println!(
            "{:<15}: {:>8} / {:<8} = {:.4} +- {:.4}",
            name,
            eff.passed,
            eff.total,
            eff.value(),
            eff.uncertainty()
        );
    }
}

/// Write the results file
fn write_results(
    writer: &mut impl Write,
    cfg: &Configuration,
    summary: &TriggerSummary,
    timestamp: &str,
    elapsed_time: Duration,
) -> io::Result<()> {
    // Run metadata
    writeln_kv(writer, timestamp)?;
    writeln_kv(writer, ("Candidate file", cfg.input.display().to_string().as_str()))?;
    writeln_kv(writer, ("SUMPT tolerance (MeV)", cfg.matcher.sum_pt_tolerance()))?;
    writeln_kv(writer, ("Per-track flags", if cfg.use_track_mask { "yes" } else { "no" }))?;
    writeln_kv(writer, ("Number of candidates", summary.decisions.len()))?;
    let elapsed_secs = elapsed_time.as_secs_f64() as Float;
    writeln_kv(writer, ("Elapsed time (s)", elapsed_secs))?;
    writeln_kv(writer, "---------------------------------------------")?;

    // Per-line efficiencies
    for (name, eff) in LINE_NAMES.iter().zip(summary.efficiencies.iter()) {
        writeln_kv(writer, (*name, eff.value()))?;
        writeln_kv(writer, ("... uncertainty", eff.uncertainty()))?;
    }
    writeln_kv(writer, "---------------------------------------------")?;

    // Per-candidate decisions
    writeln!(writer, "#cand\t{}", LINE_NAMES.join("\t"))?;
    for (idx, decision) in summary.decisions.iter().enumerate() {
        writeln!(writer, "{}\t{}", idx, decision)?;
    }
    Ok(())
}

/// Text output facility for the header of the results file
fn writeln_kv(writer: &mut impl Write, data: impl WriteKv) -> io::Result<()> {
    write!(writer, " ")?;
    data.write(writer)?;
    writeln!(writer)
}

/// Trait implemented by things which can be printed in the results header
trait WriteKv: Sized {
    /// Write down `self` to the output
    fn write(self, writer: &mut impl Write) -> io::Result<()>;
}

impl WriteKv for &str {
    // Strings work in the usual way
    fn write(self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteKv for usize {
    // Integers work in the usual way too
    fn write(self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteKv for Float {
    // Use %g-like formatting for floats
    fn write(self, writer: &mut impl Write) -> io::Result<()> {
        write_engineering(writer, self, SIG_DIGITS)
    }
}

impl<T: WriteKv> WriteKv for (&str, T) {
    // Key-value output that uses fixed-size columns for better readability
    fn write(self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{:<31}: ", self.0)?;
        self.1.write(writer)
    }
}

/// Write a floating-point number using "engineering" notation
///
/// Analogous to the %g format of the C printf function, this method switches
/// between naive and scientific notation for floating-point numbers when the
/// number being printed becomes so small that printing leading zeroes could end
/// up larger than the scientific notation, or so large that we would be forced
/// to print more significant digits than requested.
///
fn write_engineering(writer: &mut impl Write, x: Float, sig_digits: usize) -> io::Result<()> {
    let mut precision = sig_digits - 1;
    if x == 0. {
        // Zero is special because you can't take its log
        write!(writer, "0")
    } else {
        // Otherwise, use log to evaluate order of magnitude
        let log_x = x.abs().log10();
        if log_x >= -3. && log_x < (sig_digits as Float) {
            // Print using naive notation
            //
            // Since Rust's precision controls number of digits after the
            // decimal point, we must adjust it depending on magnitude in order
            // to operate at a constant number of significant digits.
            precision = (precision as isize - log_x.trunc() as isize) as usize;

            // Numbers smaller than 1 must get one extra digit since the leading
            // zero does not count as a significant digit.
            if log_x < 0. {
                precision += 1
            }

            // People don't normally expect trailing zeros or decimal point in
            // naive notation, but be careful with integer numbers...
            let str_with_zeros = format!("{:.1$}", x, precision);
            if str_with_zeros.contains('.') {
                write!(
                    writer,
                    "{}",
                    str_with_zeros.trim_end_matches('0').trim_end_matches('.')
                )
            } else {
                write!(writer, "{}", str_with_zeros)
            }
        } else {
            // Print using scientific notation
            write!(writer, "{:.1$e}", x, precision)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{candidate::Decision, tally::TriggerTally};

    fn engineering(x: Float) -> String {
        let mut buffer = Vec::new();
        write_engineering(&mut buffer, x, 6).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn engineering_notation() {
        assert_eq!(engineering(0.), "0");
        assert_eq!(engineering(0.25), "0.25");
        assert_eq!(engineering(1500.), "1500");
        assert_eq!(engineering(1.5e-5), "1.50000e-5");
    }

    #[test]
    fn engineering_notation_at_the_digit_limit() {
        assert_eq!(engineering(999999.), "999999");
        assert_eq!(engineering(1e6), "1.00000e6");
        assert_eq!(engineering(-1e6), "-1.00000e6");

        // Largest tolerance the configuration accepts at full precision
        let mut buffer = Vec::new();
        write_engineering(&mut buffer, 1e14, SIG_DIGITS).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("e14"), "{text}");
    }

    #[test]
    fn results_file_layout() {
        let cfg = Configuration::parse("in.txt\nout.txt\n1.\nno\n100\n").unwrap();
        let mut tally = TriggerTally::new();
        tally.integrate(Decision {
            two_track_mva: true,
            track_mva: false,
            global_pass: None,
        });
        tally.integrate(Decision::default());
        let summary = tally.finalize();

        let mut buffer = Vec::new();
        write_results(&mut buffer, &cfg, &summary, "now", Duration::from_secs(2)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], " now");
        assert_eq!(lines[1], format!(" {:<31}: in.txt", "Candidate file"));
        assert!(text.contains(&format!(" {:<31}: 0.5\n", "Hlt1TwoTrackMVA")));
        assert_eq!(lines[lines.len() - 3], "#cand\tHlt1TwoTrackMVA\tHlt1TrackMVA\tHlt1Global\tHlt1 TOS");
        assert_eq!(lines[lines.len() - 2], "0\t1\t0\t-\t1");
        assert_eq!(lines[lines.len() - 1], "1\t0\t0\t-\t0");
    }
}
