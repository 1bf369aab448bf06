//! End-to-end tests with the interrupt context modeled as a real thread.
//!
//! The interrupt side only ever calls the port interrupt handlers and
//! the mainline side only ever calls registry operations, mirroring the
//! producer/consumer split on hardware. Neither side touches the other's
//! ring index.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use thermion_hal::spi::{SpiSlaveConfig, SpiSlaveHw};
use thermion_hal::uart::{UartConfig, UartHw};
use thermion_io::spi::{SpiSlavePort, NO_DATA, POLL};
use thermion_io::uart::UartPort;
use thermion_io::{DeviceId, FlagChanges, Flags, IoError, LineStatus, Registry};

#[derive(Default)]
struct SimUart {
    rx_data: AtomicU8,
    tx_armed: AtomicBool,
    sent: Mutex<Vec<u8>>,
}

impl UartHw for SimUart {
    fn clock_hz(&self) -> u32 {
        16_000_000
    }
    fn enable(&self, _config: &UartConfig) {}
    fn set_baud_divisor(&self, _divisor: u16) {}
    fn read_data(&self) -> u8 {
        self.rx_data.load(Ordering::SeqCst)
    }
    fn write_data(&self, byte: u8) {
        self.sent.lock().unwrap().push(byte);
    }
    fn enable_tx_interrupt(&self) {
        self.tx_armed.store(true, Ordering::SeqCst);
    }
    fn disable_tx_interrupt(&self) {
        self.tx_armed.store(false, Ordering::SeqCst);
    }
    fn idle(&self) {
        // The next "interrupt" comes from another thread, not a wfi
        thread::yield_now();
    }
}

#[derive(Default)]
struct SimSpiSlave {
    received: AtomicU8,
    staged: AtomicU8,
}

impl SpiSlaveHw for SimSpiSlave {
    fn enable(&self, _config: &SpiSlaveConfig) {}
    fn read_data(&self) -> u8 {
        self.received.load(Ordering::SeqCst)
    }
    fn stage_output(&self, byte: u8) {
        self.staged.store(byte, Ordering::SeqCst);
    }
}

/// Deliver one byte as a receive-complete interrupt would
fn inject(port: &UartPort<SimUart>, byte: u8) {
    port.hw().rx_data.store(byte, Ordering::SeqCst);
    port.on_rx_interrupt();
}

/// One master-initiated SPI exchange; returns the slave's MISO byte
fn exchange(port: &SpiSlavePort<SimSpiSlave>, mosi: u8) -> u8 {
    port.hw().received.store(mosi, Ordering::SeqCst);
    port.on_transfer_interrupt();
    port.hw().staged.load(Ordering::SeqCst)
}

#[test]
fn blocking_getc_suspends_until_interrupt_delivers_data() {
    let uart = UartPort::new(SimUart::default());
    let spi = SpiSlavePort::new(SimSpiSlave::default());
    let mut reg = Registry::new(&uart, &spi);

    let h = reg.open(
        DeviceId::Uart0,
        Flags {
            blocking: true,
            ..Default::default()
        },
    );

    thread::scope(|s| {
        s.spawn(|| {
            for &b in b"hello" {
                inject(&uart, b);
                thread::yield_now();
            }
        });

        for &expected in b"hello" {
            assert_eq!(reg.getc(h), Ok(expected));
        }
    });
}

#[test]
fn concurrent_producer_preserves_fifo_order() {
    const COUNT: usize = 10_000;

    let uart = UartPort::new(SimUart::default());
    let spi = SpiSlavePort::new(SimSpiSlave::default());
    let mut reg = Registry::new(&uart, &spi);

    let h = reg.open(
        DeviceId::Uart0,
        Flags {
            blocking: true,
            ..Default::default()
        },
    );

    // Consumed-count lets the producer throttle instead of overflowing,
    // so every byte must come through and in order.
    let consumed = AtomicUsize::new(0);

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..COUNT {
                while i - consumed.load(Ordering::SeqCst) >= 100 {
                    thread::yield_now();
                }
                inject(&uart, i as u8);
            }
        });

        for i in 0..COUNT {
            assert_eq!(reg.getc(h), Ok(i as u8));
            consumed.store(i + 1, Ordering::SeqCst);
        }
    });

    // Producer finished and everything was consumed
    reg.ctrl(
        h,
        &FlagChanges {
            blocking: Some(false),
            ..Default::default()
        },
    );
    assert_eq!(reg.getc(h), Err(IoError::WouldBlock));
}

#[test]
fn uart_command_loopback_through_both_rings() {
    let uart = UartPort::new(SimUart::default());
    let spi = SpiSlavePort::new(SimSpiSlave::default());
    let mut reg = Registry::new(&uart, &spi);

    let h = reg.open(DeviceId::Uart0, Flags::default());
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            // Deliver the request, then keep servicing the TX-empty
            // interrupt for as long as it stays armed.
            for &b in b"ping\n" {
                inject(&uart, b);
            }
            while !done.load(Ordering::SeqCst) {
                if uart.hw().tx_armed.load(Ordering::SeqCst) {
                    uart.on_tx_interrupt();
                }
                thread::yield_now();
            }
        });

        // Poll for the complete command line
        let mut dest = [0u8; 32];
        let len = loop {
            match reg.gets(h, &mut dest) {
                LineStatus::Complete(len) => break len,
                LineStatus::Again => thread::yield_now(),
                LineStatus::Overflow => panic!("unexpected overflow"),
            }
        };
        assert_eq!(&dest[..len], b"ping");

        // Respond and wait for the interrupt side to push it out
        reg.write_str(h, "pong\n").unwrap();
        while uart.hw().sent.lock().unwrap().len() < 5 {
            thread::yield_now();
        }
        done.store(true, Ordering::SeqCst);
    });

    assert_eq!(uart.hw().sent.lock().unwrap().as_slice(), b"pong\n");
}

#[test]
fn spi_request_response_with_explicit_no_data() {
    let uart = UartPort::new(SimUart::default());
    let spi = SpiSlavePort::new(SimSpiSlave::default());
    let mut reg = Registry::new(&uart, &spi);

    let h = reg.open(DeviceId::Spi0, Flags::default());

    // Master clocks a request; the slave has nothing queued yet, so
    // every exchange answers NO_DATA.
    for &b in b"st\n" {
        assert_eq!(exchange(&spi, b), NO_DATA);
    }

    // Slave assembles the line and queues its response
    let mut dest = [0u8; 16];
    assert_eq!(reg.gets(h, &mut dest), LineStatus::Complete(2));
    assert_eq!(&dest[..2], b"st");
    reg.write_str(h, "ok\n").unwrap();

    // Master polls the response out; POLL contributes no input
    let mut answer = Vec::new();
    loop {
        let miso = exchange(&spi, POLL);
        if miso == NO_DATA {
            break;
        }
        answer.push(miso);
    }
    assert_eq!(answer.as_slice(), b"ok\n");

    // Drained: polls keep answering NO_DATA, and none of the POLL
    // bytes leaked into the RX ring
    assert_eq!(exchange(&spi, POLL), NO_DATA);
    assert_eq!(reg.gets(h, &mut dest), LineStatus::Again);
}
