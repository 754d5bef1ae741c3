use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use log::*;
use tinypico::esp::EspPlatform;
use tinypico::{MonotonicClock, TinyPico};

include!(concat!(env!("OUT_DIR"), "/demo_settings.rs"));

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();

    info!("Starting TinyPICO DotStar demo");
    info!(
        "Cycle every {} ms, brightness {}, status every {} ms",
        CYCLE_INTERVAL_MS, DOTSTAR_BRIGHTNESS, STATUS_INTERVAL_MS
    );

    let peripherals = Peripherals::take()?;
    let platform = EspPlatform::new(peripherals.adc1, peripherals.pins.gpio35)?;
    let mut board = TinyPico::new(platform)?;

    board.set_brightness(u8::try_from(DOTSTAR_BRIGHTNESS).unwrap_or(u8::MAX));
    board.clear()?;

    let mut next_status = 0u64;
    loop {
        board.cycle_color_every(u64::from(CYCLE_INTERVAL_MS))?;

        let now = board.platform().millis();
        if now >= next_status {
            next_status = now + u64::from(STATUS_INTERVAL_MS);
            let volts = board.battery_voltage()?;
            let charging = board.is_charging()?;
            info!(
                "🔋 Battery {:.2} V, {}",
                volts,
                if charging { "charging" } else { "not charging" }
            );
        }

        FreeRtos::delay_ms(1);
    }
}
