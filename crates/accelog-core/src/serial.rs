use serialport::{SerialPort, SerialPortInfo};
use std::time::Duration;

use crate::line::{LineReader, LineSource};
use crate::{CollectError, TextEncoding};

/// Baud rate the accelerometer firmware streams at.
pub const BAUD_RATE: u32 = 115_200;

/// Upper bound on a single line-read attempt.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (port_type, vid, pid, serial_number, manufacturer, product) = match &info.port_type {
            serialport::SerialPortType::UsbPort(usb) => (
                "USB".to_string(),
                Some(usb.vid),
                Some(usb.pid),
                usb.serial_number.clone(),
                usb.manufacturer.clone(),
                usb.product.clone(),
            ),
            serialport::SerialPortType::PciPort => ("PCI".to_string(), None, None, None, None, None),
            serialport::SerialPortType::BluetoothPort => ("Bluetooth".to_string(), None, None, None, None, None),
            serialport::SerialPortType::Unknown => ("Unknown".to_string(), None, None, None, None, None),
        };
        Self {
            port_name: info.port_name,
            port_type,
            vid,
            pid,
            serial_number,
            manufacturer,
            product,
        }
    }
}

impl std::fmt::Display for PortInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.port_name, self.port_type)?;
        if let (Some(vid), Some(pid)) = (self.vid, self.pid) {
            write!(f, " {vid:04X}:{pid:04X}")?;
        }
        if let Some(product) = &self.product {
            write!(f, " {product}")?;
        }
        if let Some(manufacturer) = &self.manufacturer {
            write!(f, " ({manufacturer})")?;
        }
        Ok(())
    }
}

pub fn list_ports() -> Result<Vec<PortInfo>, CollectError> {
    let ports = serialport::available_ports().map_err(CollectError::Enumerate)?;
    Ok(ports.into_iter().map(PortInfo::from).collect())
}

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
    pub timeout: Duration,
    /// Decides how incoming bytes are framed into lines.
    pub encoding: TextEncoding,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: BAUD_RATE,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
            timeout: READ_TIMEOUT,
            encoding: TextEncoding::Utf8,
        }
    }
}

impl SerialConfig {
    pub fn new(port_name: &str) -> Self {
        Self {
            port_name: port_name.to_string(),
            ..Default::default()
        }
    }
}

/// An open port read line by line.
pub struct SerialConnection {
    reader: LineReader<Box<dyn SerialPort>>,
    cfg: SerialConfig,
}

impl SerialConnection {
    pub fn open(cfg: SerialConfig) -> Result<Self, CollectError> {
        let port = serialport::new(&cfg.port_name, cfg.baud_rate)
            .data_bits(cfg.data_bits)
            .parity(cfg.parity)
            .stop_bits(cfg.stop_bits)
            .flow_control(cfg.flow_control)
            .timeout(cfg.timeout)
            .open()
            .map_err(|source| CollectError::Open {
                port: cfg.port_name.clone(),
                source,
            })?;
        log::debug!("opened {} at {} baud", cfg.port_name, cfg.baud_rate);

        Ok(Self {
            reader: LineReader::for_encoding(port, cfg.timeout, cfg.encoding),
            cfg,
        })
    }

    pub fn config(&self) -> &SerialConfig {
        &self.cfg
    }
}

impl LineSource for SerialConnection {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, CollectError> {
        self.reader.read_line()
    }
}
