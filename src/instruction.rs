use std::fmt;

/// A general purpose register index, V0..VF. Only the low nibble is kept, so
/// every `Reg` indexes a real register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(u8);

impl Reg {
    /// the carry/borrow/collision flag register
    pub const VF: Reg = Reg(0xF);
    pub const V0: Reg = Reg(0x0);

    pub fn new(index: u8) -> Self {
        Reg(index & 0x0F)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

/// # Instruction
///
/// A decoded 16-bit opcode. The high nibble picks the class:
/// - `(_, n, n, n)` is a 12-bit address
/// - `(_, _, n, n)` is an 8-bit constant compared with or assigned to Vx
/// - `(_, x, _, _)` is register Vx
/// - `(_, _, y, _)` is register Vy
/// - `(_, _, _, n)` picks the 0x8 variant, or the sprite height for 0xD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 0nnn: machine code routine on the original hardware; ignored
    Sys(u16),
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SkipIfEqConst(Reg, u8),
    /// 4xnn
    SkipIfNeConst(Reg, u8),
    /// 5xy0
    SkipIfEqReg(Reg, Reg),
    /// 6xnn
    SetConst(Reg, u8),
    /// 7xnn
    AddConst(Reg, u8),
    /// 8xy0
    Assign(Reg, Reg),
    /// 8xy1
    Or(Reg, Reg),
    /// 8xy2
    And(Reg, Reg),
    /// 8xy3
    Xor(Reg, Reg),
    /// 8xy4
    AddReg(Reg, Reg),
    /// 8xy5
    SubReg(Reg, Reg),
    /// 8xy6
    ShiftRight(Reg, Reg),
    /// 8xy7
    SubReversed(Reg, Reg),
    /// 8xyE
    ShiftLeft(Reg, Reg),
    /// 9xy0
    SkipIfNeReg(Reg, Reg),
    /// Annn
    SetIndex(u16),
    /// Bnnn
    SetIndexOffset(u16),
    /// Dxyn
    Draw(Reg, Reg, u8),
    /// anything else
    Unknown(u16),
}

fn nibbles(op: u16) -> (u8, u8, u8, u8) {
    (
        ((op & 0xF000) >> 12) as u8,
        ((op & 0x0F00) >> 8) as u8,
        ((op & 0x00F0) >> 4) as u8,
        (op & 0x000F) as u8,
    )
}

impl Instruction {
    /// Selects the Instruction for a raw opcode word
    pub fn decode(op: u16) -> Self {
        use Instruction::*;

        let (class, x, y, n) = nibbles(op);
        let (vx, vy) = (Reg::new(x), Reg::new(y));
        let nn = (op & 0x00FF) as u8;
        let nnn = op & 0x0FFF;

        match (class, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, ..) => Sys(nnn),
            (0x1, ..) => Jump(nnn),
            (0x2, ..) => Call(nnn),
            (0x3, ..) => SkipIfEqConst(vx, nn),
            (0x4, ..) => SkipIfNeConst(vx, nn),
            (0x5, .., 0x0) => SkipIfEqReg(vx, vy),
            (0x6, ..) => SetConst(vx, nn),
            (0x7, ..) => AddConst(vx, nn),
            (0x8, .., 0x0) => Assign(vx, vy),
            (0x8, .., 0x1) => Or(vx, vy),
            (0x8, .., 0x2) => And(vx, vy),
            (0x8, .., 0x3) => Xor(vx, vy),
            (0x8, .., 0x4) => AddReg(vx, vy),
            (0x8, .., 0x5) => SubReg(vx, vy),
            (0x8, .., 0x6) => ShiftRight(vx, vy),
            (0x8, .., 0x7) => SubReversed(vx, vy),
            (0x8, .., 0xE) => ShiftLeft(vx, vy),
            (0x9, .., 0x0) => SkipIfNeReg(vx, vy),
            (0xA, ..) => SetIndex(nnn),
            (0xB, ..) => SetIndexOffset(nnn),
            (0xD, ..) => Draw(vx, vy, n),
            _ => Unknown(op),
        }
    }
}

/// disassembly, for tracing
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Sys(a) => write!(f, "SYS {:03X}", a),
            Jump(a) => write!(f, "JP {:03X}", a),
            Call(a) => write!(f, "CALL {:03X}", a),
            SkipIfEqConst(x, nn) => write!(f, "SE {}, {:02X}", x, nn),
            SkipIfNeConst(x, nn) => write!(f, "SNE {}, {:02X}", x, nn),
            SkipIfEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            SetConst(x, nn) => write!(f, "LD {}, {:02X}", x, nn),
            AddConst(x, nn) => write!(f, "ADD {}, {:02X}", x, nn),
            Assign(x, y) => write!(f, "LD {}, {}", x, y),
            Or(x, y) => write!(f, "OR {}, {}", x, y),
            And(x, y) => write!(f, "AND {}, {}", x, y),
            Xor(x, y) => write!(f, "XOR {}, {}", x, y),
            AddReg(x, y) => write!(f, "ADD {}, {}", x, y),
            SubReg(x, y) => write!(f, "SUB {}, {}", x, y),
            ShiftRight(x, y) => write!(f, "SHR {}, {}", x, y),
            SubReversed(x, y) => write!(f, "SUBN {}, {}", x, y),
            ShiftLeft(x, y) => write!(f, "SHL {}, {}", x, y),
            SkipIfNeReg(x, y) => write!(f, "SNE {}, {}", x, y),
            SetIndex(a) => write!(f, "LD I, {:03X}", a),
            SetIndexOffset(a) => write!(f, "LD I, {:03X} + V0", a),
            Draw(x, y, n) => write!(f, "DRW {}, {}, {:X}", x, y, n),
            Unknown(op) => write!(f, "??? {:04X}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Instruction::*;

    #[test]
    fn test_nibbles() {
        assert_eq!(nibbles(0xABCD), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_reg_masks_to_nibble() {
        assert_eq!(Reg::new(0x1F), Reg::VF);
        assert_eq!(Reg::new(0x10).index(), 0);
    }

    #[test]
    fn test_decode_class_0() {
        assert_eq!(Instruction::decode(0x00E0), ClearScreen);
        assert_eq!(Instruction::decode(0x00EE), Return);
        assert_eq!(Instruction::decode(0x0123), Sys(0x123));
    }

    #[test]
    fn test_decode_addresses() {
        assert_eq!(Instruction::decode(0x1ABC), Jump(0xABC));
        assert_eq!(Instruction::decode(0x2123), Call(0x123));
        assert_eq!(Instruction::decode(0xA050), SetIndex(0x050));
        assert_eq!(Instruction::decode(0xB300), SetIndexOffset(0x300));
    }

    #[test]
    fn test_decode_register_forms() {
        assert_eq!(
            Instruction::decode(0x3A11),
            SkipIfEqConst(Reg::new(0xA), 0x11)
        );
        assert_eq!(Instruction::decode(0x6005), SetConst(Reg::V0, 0x05));
        assert_eq!(
            Instruction::decode(0x5120),
            SkipIfEqReg(Reg::new(1), Reg::new(2))
        );
        assert_eq!(
            Instruction::decode(0xD015),
            Draw(Reg::V0, Reg::new(1), 0x5)
        );
    }

    #[test]
    fn test_decode_class_8() {
        let (x, y) = (Reg::new(1), Reg::new(2));
        assert_eq!(Instruction::decode(0x8120), Assign(x, y));
        assert_eq!(Instruction::decode(0x8121), Or(x, y));
        assert_eq!(Instruction::decode(0x8122), And(x, y));
        assert_eq!(Instruction::decode(0x8123), Xor(x, y));
        assert_eq!(Instruction::decode(0x8124), AddReg(x, y));
        assert_eq!(Instruction::decode(0x8125), SubReg(x, y));
        assert_eq!(Instruction::decode(0x8126), ShiftRight(x, y));
        assert_eq!(Instruction::decode(0x8127), SubReversed(x, y));
        assert_eq!(Instruction::decode(0x812E), ShiftLeft(x, y));
        assert_eq!(Instruction::decode(0x8128), Unknown(0x8128));
    }

    #[test]
    fn test_decode_unknown() {
        assert_eq!(Instruction::decode(0x5121), Unknown(0x5121));
        assert_eq!(Instruction::decode(0x9121), Unknown(0x9121));
        // random, keypad, timers and friends are not part of this machine
        assert_eq!(Instruction::decode(0xC0FF), Unknown(0xC0FF));
        assert_eq!(Instruction::decode(0xE19E), Unknown(0xE19E));
        assert_eq!(Instruction::decode(0xF129), Unknown(0xF129));
    }

    #[test]
    fn test_disassembly() {
        assert_eq!(Instruction::decode(0xD015).to_string(), "DRW V0, V1, 5");
        assert_eq!(Instruction::decode(0x7003).to_string(), "ADD V0, 03");
        assert_eq!(Instruction::decode(0xFFFF).to_string(), "??? FFFF");
    }
}
