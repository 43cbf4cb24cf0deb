//! judgelight - referee light firmware
//!
//! One binary for every node: the `role-*` feature picks whether this board
//! is the host or one of the three judge modules. All nodes share an XBee
//! radio on UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use judgelight_drivers::DebouncedButton;

mod channels;
mod config;
mod link;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("judgelight firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // XBee on UART0 (GPIO0 = TX, GPIO1 = RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config::LINK_BAUD;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", config::LINK_BAUD);

    spawner.spawn(tasks::radio_rx_task(rx)).unwrap();
    spawner.spawn(tasks::radio_tx_task(tx)).unwrap();

    // Pin assignments (Raspberry Pi Pico):
    //   GPIO2      white button / host operator button (to ground)
    //   GPIO3      red button
    //   GPIO6..8   module white, red and indicator LEDs
    //   GPIO9      host blue lamp
    //   GPIO10..15 host seat lamps (left, right, center; white then red)
    //   GPIO25     on-board LED

    #[cfg(feature = "role-host")]
    {
        use judgelight_core::config::HostConfig;
        use judgelight_drivers::{HostLamps, OperatorButton, SeatLamps};

        let operator = OperatorButton::new(DebouncedButton::new_active_low(Input::new(
            p.PIN_2,
            Pull::Up,
        )));
        let lamps = HostLamps::new(
            [
                SeatLamps {
                    white: Output::new(p.PIN_10, Level::Low),
                    red: Output::new(p.PIN_11, Level::Low),
                },
                SeatLamps {
                    white: Output::new(p.PIN_12, Level::Low),
                    red: Output::new(p.PIN_13, Level::Low),
                },
                SeatLamps {
                    white: Output::new(p.PIN_14, Level::Low),
                    red: Output::new(p.PIN_15, Level::Low),
                },
            ],
            Output::new(p.PIN_9, Level::Low),
            Output::new(p.PIN_25, Level::Low),
        );

        let host_config = HostConfig::new(config::TIMINGS);
        info!("Role: host");
        spawner.spawn(tasks::host_task(host_config, operator, lamps)).unwrap();
    }

    #[cfg(not(feature = "role-host"))]
    {
        use judgelight_core::config::ModuleConfig;
        use judgelight_drivers::{ModuleButtons, ModuleLeds};

        let buttons = ModuleButtons::new(
            DebouncedButton::new_active_low(Input::new(p.PIN_2, Pull::Up)),
            DebouncedButton::new_active_low(Input::new(p.PIN_3, Pull::Up)),
        );
        let leds = ModuleLeds::new(
            Output::new(p.PIN_6, Level::Low),
            Output::new(p.PIN_7, Level::Low),
            Output::new(p.PIN_8, Level::Low),
            Output::new(p.PIN_25, Level::Low),
        );

        let module_config = ModuleConfig::new(config::SEAT).with_timings(config::TIMINGS);
        info!("Role: {:?} module", config::SEAT);
        spawner.spawn(tasks::module_task(module_config, buttons, leds)).unwrap();
    }

    info!("All tasks spawned");
}
