//! Command-line driver
//!
//! Flags override values from an optional JSON config file, which in turn
//! overrides the built-in defaults. The run uses the simulated front-end.

use std::path::PathBuf;

use clap::Parser;

use crate::adapters::json_store::JsonTableStore;
use crate::adapters::sim_radio::SimulatedRadio;
use crate::calibrate::calibrate_rx_frontend;
use crate::domain::{CalResult, CalSlot, CalibrationConfig, CalibrationTable};
use crate::sweep::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(
    name = "rxcal",
    version,
    about = "Generate an RX front-end IQ imbalance calibration table",
    long_about = "Measures leakage between TX and RX through the front-end's CAL \
                  antenna port and, at each LO frequency across the tunable range, \
                  searches for the IQ balance correction that best suppresses the image."
)]
pub struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print one line per frequency instead of progress dots
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Device address args
    #[arg(long)]
    pub args: Option<String>,

    /// RX and TX sample rate in Hz
    #[arg(long)]
    pub rate: Option<f64>,

    /// Transmit wave amplitude in counts
    #[arg(long)]
    pub tx_wave_ampl: Option<f64>,

    /// TX LO offset from the RX LO in Hz
    #[arg(long, allow_hyphen_values = true)]
    pub tx_offset: Option<f64>,

    /// TX gain in dB
    #[arg(long, allow_hyphen_values = true)]
    pub tx_gain: Option<f64>,

    /// RX gain in dB
    #[arg(long, allow_hyphen_values = true)]
    pub rx_gain: Option<f64>,

    /// Step size for LO sweep in Hz
    #[arg(long)]
    pub freq_step: Option<f64>,

    /// Samples per data capture
    #[arg(long)]
    pub nsamps: Option<usize>,

    /// Directory the calibration table is written to
    #[arg(long, default_value = "cal")]
    pub output_dir: PathBuf,

    /// Serial number reported by the simulated front-end
    #[arg(long, default_value = "SIM0001")]
    pub serial: String,
}

impl Args {
    /// Resolve defaults, config file and flags into one validated configuration
    pub fn to_config(&self) -> CalResult<CalibrationConfig> {
        let mut config = match &self.config {
            Some(path) => CalibrationConfig::load(path)?,
            None => CalibrationConfig::default(),
        };

        if self.verbose {
            config.verbose = true;
        }
        if let Some(args) = &self.args {
            config.device_args = args.clone();
        }
        if let Some(rate) = self.rate {
            config.sample_rate = rate;
        }
        if let Some(ampl) = self.tx_wave_ampl {
            config.tx_wave_ampl = ampl;
        }
        if let Some(offset) = self.tx_offset {
            config.tx_offset = offset;
        }
        if let Some(gain) = self.tx_gain {
            config.tx_gain = gain;
        }
        if let Some(gain) = self.rx_gain {
            config.rx_gain = gain;
        }
        if let Some(step) = self.freq_step {
            config.freq_step = step;
        }
        if let Some(nsamps) = self.nsamps {
            config.nsamps = nsamps;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run a full calibration and write the table into `args.output_dir`
pub fn run(args: &Args) -> CalResult<CalibrationTable> {
    let config = args.to_config()?;

    println!();
    println!("Creating the device with: {}...", config.device_args);
    let mut radio = SimulatedRadio::new(&args.serial);
    let mut store = JsonTableStore::new(args.output_dir.clone());
    let mut progress = ConsoleProgress::new(config.verbose);

    let table = calibrate_rx_frontend(&mut radio, &mut store, &config, &mut progress)?;

    let path = store.path_for(&CalSlot::rx(&args.serial))?;
    println!(
        "Calibration table with {} entries written to {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_parse_with_defaults() {
        let args = Args::parse_from(["rxcal"]);
        assert!(!args.verbose);
        assert_eq!(args.serial, "SIM0001");
        let config = args.to_config().unwrap();
        assert_eq!(config, CalibrationConfig::default());
    }

    #[test]
    fn flags_override_config_values() {
        let args = Args::parse_from([
            "rxcal",
            "--verbose",
            "--rate",
            "4e6",
            "--rx-gain",
            "-3",
            "--nsamps",
            "2048",
        ]);
        let config = args.to_config().unwrap();
        assert!(config.verbose);
        assert_eq!(config.sample_rate, 4e6);
        assert_eq!(config.rx_gain, -3.0);
        assert_eq!(config.nsamps, 2048);
    }

    #[test]
    fn flags_win_over_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"freq_step": 20e6, "tx_gain": 5.0}}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = Args::parse_from(["rxcal", "--config", path.as_str(), "--tx-gain", "7"]);
        let config = args.to_config().unwrap();
        assert_eq!(config.freq_step, 20e6);
        assert_eq!(config.tx_gain, 7.0);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let args = Args::parse_from(["rxcal", "--freq-step", "0"]);
        assert!(args.to_config().is_err());
    }
}
