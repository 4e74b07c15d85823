/// Faults an ill-formed program can provoke. All of them are recoverable
/// from the host's point of view: the machine never panics on program
/// input, it hands the fault back from `step()` or `load_program()` and
/// leaves the host to decide whether to halt or keep stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Chip8Error {
    #[error("address {addr:#06x} outside addressable memory")]
    AddressOutOfRange { addr: u16 },

    #[error("call stack overflow, more than 16 nested calls")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {opcode:#06x}")]
    UnknownOpcode { opcode: u16 },

    #[error("program is {len} bytes, only {max} fit above 0x200")]
    ProgramTooLarge { len: usize, max: usize },
}
