use std::process::ExitCode;

use log::error;
use tanksim::{Session, SimulationConfig};

/// Print one row every `interval` seconds of the trend window
fn print_trend(session: &Session, interval: f64) {
    println!(
        "{:>8} {:>10} {:>10} {:>10} {:>10}",
        "t [s]", "h1 [m]", "h2 [m]", "sp [m]", "u [%]"
    );
    println!("{}", "-".repeat(52));

    let mut next_print = f64::NEG_INFINITY;
    for sample in session.trend().data() {
        if sample.time + 1e-9 < next_print {
            continue;
        }
        next_print = sample.time + interval;
        println!(
            "{:8.1} {:10.4} {:10.4} {:10.3} {:10.1}",
            sample.time, sample.tank1_level, sample.tank2_level, sample.setpoint, sample.controller_output
        );
    }
}

fn run() -> tanksim::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig {
            duration: 120.0,
            seed: Some(42),
            scenario: Some("Stable Control".to_string()),
            ..Default::default()
        },
    };

    println!("tanksim - Two-Tank Level Control");
    println!("================================\n");

    let mut session = config.build_session()?;
    let state = session.state();
    println!("Strategy:  {:?}", state.control_strategy);
    println!(
        "Tuning:    Kc = {} %/m, Ti = {} s, Td = {} s",
        state.controller.kc, state.controller.ti, state.controller.td
    );
    println!("Setpoint:  {} m", state.controller.setpoint);
    println!("Pump flow: {} L/min", state.pump_flow);
    println!(
        "Running {} s with dt = {} s\n",
        config.duration,
        session.time_step()
    );

    let ticks = session.run_for(config.duration);
    print_trend(&session, 5.0);

    let state = session.state();
    println!(
        "\n{} ticks, final error {:.4} m, tank 1 at {:.1}%",
        ticks,
        state.error(),
        state.tank1.level_percent()
    );

    if let Some(path) = &config.output {
        session.save_csv(path)?;
        println!("CSV written to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
