use super::bridge::OpenListener;
use super::device::DeviceDescriptor;
use crate::looper::LooperHandle;
use chrono::{DateTime, Local};
use thiserror::Error;

/// Error type for MIDI operations
#[derive(Debug, Error)]
pub enum MidiError {
    /// The platform MIDI subsystem could not be initialized
    #[error("MIDI init error: {0}")]
    Init(String),
    /// Opening or connecting to a device failed
    #[error("MIDI connection error: {0}")]
    Connection(String),
    /// Sending bytes to an opened device failed
    #[error("MIDI send error: {0}")]
    Send(String),
    /// No port matched the requested device
    #[error("MIDI device not found: {0}")]
    NotFound(String),
}

impl From<midir::InitError> for MidiError {
    fn from(e: midir::InitError) -> Self {
        MidiError::Init(e.to_string())
    }
}

impl From<midir::ConnectError<midir::MidiOutput>> for MidiError {
    fn from(e: midir::ConnectError<midir::MidiOutput>) -> Self {
        MidiError::Connection(e.to_string())
    }
}

impl From<midir::SendError> for MidiError {
    fn from(e: midir::SendError) -> Self {
        MidiError::Send(e.to_string())
    }
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// Represents a MIDI message that can be sent to an opened device
#[derive(Debug, Clone, PartialEq)]
pub enum MidiMessage {
    /// Note On message with note number and velocity
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note Off message with note number and velocity
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Control Change message with controller number and value
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    /// Program Change message with program number
    ProgramChange { channel: u8, program: u8 },
    /// Channel mode message 123
    AllNotesOff { channel: u8 },
    /// MIDI Clock timing message
    Clock,
    /// MIDI Start message
    Start,
    /// MIDI Stop message
    Stop,
    /// MIDI Continue message
    Continue,
}

impl MidiMessage {
    pub fn parse(data: &[u8]) -> Option<MidiMessage> {
        let status = *data.first()?;
        let channel = status & 0x0F;

        match status & 0xF0 {
            0x90 if data.len() >= 3 => Some(MidiMessage::NoteOn {
                channel,
                note: data[1],
                velocity: data[2],
            }),
            0x80 if data.len() >= 3 => Some(MidiMessage::NoteOff {
                channel,
                note: data[1],
                velocity: data[2],
            }),
            0xB0 if data.len() >= 3 && data[1] == 123 => Some(MidiMessage::AllNotesOff { channel }),
            0xB0 if data.len() >= 3 => Some(MidiMessage::ControlChange {
                channel,
                controller: data[1],
                value: data[2],
            }),
            0xC0 if data.len() >= 2 => Some(MidiMessage::ProgramChange {
                channel,
                program: data[1],
            }),
            0xF0 => match status {
                0xF8 => Some(MidiMessage::Clock),
                0xFA => Some(MidiMessage::Start),
                0xFB => Some(MidiMessage::Continue),
                0xFC => Some(MidiMessage::Stop),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => vec![0x90 | (channel & 0x0F), *note, *velocity],
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => vec![0x80 | (channel & 0x0F), *note, *velocity],
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => vec![0xB0 | (channel & 0x0F), *controller, *value],
            MidiMessage::ProgramChange { channel, program } => {
                vec![0xC0 | (channel & 0x0F), *program]
            }
            MidiMessage::AllNotesOff { channel } => vec![0xB0 | (channel & 0x0F), 123, 0],
            MidiMessage::Clock => vec![0xF8],
            MidiMessage::Start => vec![0xFA],
            MidiMessage::Stop => vec![0xFC],
            MidiMessage::Continue => vec![0xFB],
        }
    }
}

/// Transport the device is attached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Usb,
    Bluetooth,
    Virtual,
    Unknown,
}

impl DeviceKind {
    /// Best guess from the device name; backends without transport
    /// metadata use this.
    pub fn guess_from_name(name: &str) -> DeviceKind {
        let lower = name.to_lowercase();
        let is_word = |w: &str| lower.split(|c: char| !c.is_alphanumeric()).any(|t| t == w);
        if lower.contains("bluetooth") || is_word("ble") {
            DeviceKind::Bluetooth
        } else if lower.contains("through") || lower.contains("virtual") || lower.contains("iac") {
            DeviceKind::Virtual
        } else if lower.contains("usb") {
            DeviceKind::Usb
        } else {
            DeviceKind::Unknown
        }
    }
}

/// Handle to a device the platform has finished opening.
pub trait OpenedDevice: Send + Sync {
    /// Descriptor the open was requested with.
    fn info(&self) -> &DeviceDescriptor;

    fn kind(&self) -> DeviceKind;

    fn opened_at(&self) -> DateTime<Local>;

    /// Sends raw bytes into the device's input port.
    fn send(&self, bytes: &[u8]) -> Result<()>;

    /// Releases the connection. Sends after this fail.
    fn close(&self);

    fn send_message(&self, msg: &MidiMessage) -> Result<()> {
        self.send(&msg.to_bytes())
    }
}

/// Platform MIDI service: enumeration plus asynchronous open.
pub trait MidiService: Send + Sync {
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>>;

    /// Starts opening `device` without blocking. On success the listener is
    /// posted to `looper`; on failure it is dropped and nothing is delivered.
    fn open_device(&self, device: &DeviceDescriptor, listener: OpenListener, looper: LooperHandle);
}
