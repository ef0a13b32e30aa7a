//! Simulated Unit Scroll for host tests.
//!
//! Records every I2C transaction and models the device side of the register
//! protocol: a single-byte write selects a register, a longer write stores
//! its payload, and a read returns the selected register. Reads can be
//! scripted per register, and NACKs can be injected.

use std::collections::{HashMap, VecDeque};
use std::vec::Vec;

use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::registers::{BUTTON, DEFAULT_ADDRESS, I2C_ADDRESS};

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Write { addr: u8, data: Vec<u8> },
    Read { addr: u8, len: usize },
}

impl Transaction {
    pub fn write(addr: u8, data: &[u8]) -> Self {
        Transaction::Write {
            addr,
            data: data.to_vec(),
        }
    }

    pub fn read(addr: u8, len: usize) -> Self {
        Transaction::Read { addr, len }
    }
}

enum Reply {
    Bytes(Vec<u8>),
    Nack,
}

/// Mock Unit Scroll
#[derive(Default)]
pub struct MockScroll {
    address: u8,
    selected: Option<u8>,
    registers: HashMap<u8, Vec<u8>>,
    scripts: HashMap<u8, VecDeque<Reply>>,
    failing_writes: usize,
    transactions: Vec<Transaction>,
}

impl MockScroll {
    /// A device at the default address with the button released and the
    /// encoder at zero.
    pub fn new() -> Self {
        let mut mock = Self {
            address: DEFAULT_ADDRESS,
            ..Default::default()
        };
        mock.registers.insert(BUTTON, vec![0x01]);
        mock
    }

    /// Queue the bytes returned by the next unscripted read of `register`.
    /// Once the script runs out, reads return the last value served.
    pub fn script_read(&mut self, register: u8, bytes: &[u8]) {
        self.scripts
            .entry(register)
            .or_default()
            .push_back(Reply::Bytes(bytes.to_vec()));
    }

    /// Queue a NACK for a read of `register`.
    pub fn script_nack(&mut self, register: u8) {
        self.scripts.entry(register).or_default().push_back(Reply::Nack);
    }

    /// Make the next write transaction fail with a data NACK.
    pub fn fail_next_write(&mut self) {
        self.failing_writes += 1;
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Address the simulated device currently answers on.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Current contents of `register` as last written or served.
    pub fn register(&self, register: u8) -> Option<&[u8]> {
        self.registers.get(&register).map(Vec::as_slice)
    }

    fn on_write(&mut self, addr: u8, data: &[u8]) -> Result<(), ErrorKind> {
        self.transactions.push(Transaction::write(addr, data));

        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }
        if addr != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let Some((&offset, payload)) = data.split_first() else {
            return Ok(());
        };
        self.selected = Some(offset);

        if !payload.is_empty() {
            self.registers.insert(offset, payload.to_vec());
            if offset == I2C_ADDRESS {
                self.address = payload[0];
            }
        }
        Ok(())
    }

    fn on_read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<(), ErrorKind> {
        self.transactions.push(Transaction::read(addr, buffer.len()));

        if addr != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        buffer.fill(0);
        let Some(register) = self.selected else {
            return Ok(());
        };

        match self.scripts.get_mut(&register).and_then(VecDeque::pop_front) {
            Some(Reply::Bytes(bytes)) => {
                self.registers.insert(register, bytes);
            }
            Some(Reply::Nack) => {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
            }
            None => {}
        }

        if let Some(value) = self.registers.get(&register) {
            let len = buffer.len().min(value.len());
            buffer[..len].copy_from_slice(&value[..len]);
        }
        Ok(())
    }
}

impl ErrorType for MockScroll {
    type Error = ErrorKind;
}

impl I2c for MockScroll {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(data) => self.on_write(address, data)?,
                Operation::Read(buffer) => self.on_read(address, buffer)?,
            }
        }
        Ok(())
    }
}
