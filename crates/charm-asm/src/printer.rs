//! Platform-aware GNU-as emission.

use crate::instr::{AsmGlobal, Function, Instr, Program};
use crate::regs::{FReg, IReg};

/// Print a whole program in GNU-as syntax.
#[must_use]
pub fn print_program(p: &Program, darwin: bool) -> String {
    let mut printer = Printer::new(darwin);
    printer.program(p);
    printer.finish()
}

/// Text emitter. `darwin` selects Mach-O conventions over ELF.
pub struct Printer {
    out: String,
    darwin: bool,
}

impl Printer {
    #[must_use]
    pub const fn new(darwin: bool) -> Self {
        Self {
            out: String::new(),
            darwin,
        }
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    pub fn program(&mut self, p: &Program) {
        for f in &p.functions {
            self.function(f);
        }
        for g in &p.globals {
            self.global(g);
        }
    }

    // ========================================================================
    // Emission helpers
    // ========================================================================

    /// One tab-indented line.
    fn line(&mut self, text: impl std::fmt::Display) {
        self.out.push('\t');
        self.out.push_str(&text.to_string());
        self.out.push('\n');
    }

    /// One line at column zero.
    fn raw(&mut self, text: impl std::fmt::Display) {
        self.out.push_str(&text.to_string());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Public symbol name: Mach-O prefixes with `_`; local labels
    /// (starting with `.`) are never prefixed.
    fn sym(&self, name: &str) -> String {
        if self.darwin && !name.starts_with('.') {
            format!("_{name}")
        } else {
            name.to_string()
        }
    }

    /// Branch target: prefixed only when the instruction marks it as a
    /// symbol rather than a local label.
    fn target(&self, name: &str, is_symbol: bool) -> String {
        if is_symbol {
            self.sym(name)
        } else {
            name.to_string()
        }
    }

    fn align(&mut self, bytes: i64) {
        if self.darwin {
            self.line(format!(".p2align {}", bytes.trailing_zeros()));
        } else {
            self.line(format!(".align {bytes}"));
        }
    }

    // ========================================================================
    // Functions and globals
    // ========================================================================

    pub fn function(&mut self, f: &Function) {
        let name = self.sym(&f.name);
        self.line(".text");
        self.align(4);
        self.line(format!(".globl {name}"));
        if !self.darwin {
            self.line(format!(".type {name}, %function"));
        }
        self.raw(format!("{name}:"));
        for i in &f.instrs {
            self.instr(i);
        }
        if !self.darwin {
            self.line(format!(".size {name}, .-{name}"));
        }
        self.blank();
    }

    pub fn global(&mut self, g: &AsmGlobal) {
        if g.readonly {
            if self.darwin {
                self.line(".section __DATA,__const");
            } else {
                self.line(".section .rodata");
            }
        } else {
            self.line(".data");
        }
        let local = g.name.starts_with('.');
        if !local {
            self.line(format!(".globl {}", self.sym(&g.name)));
        }
        if g.align > 1 {
            self.align(g.align);
        }
        self.raw(format!("{}:", self.sym(&g.name)));
        for chunk in g.init.chunks(8) {
            let bytes: Vec<String> = chunk.iter().map(|b| b.to_string()).collect();
            self.line(format!(".byte {}", bytes.join(", ")));
        }
        let tail = g.size - g.init.len() as i64;
        if tail > 0 {
            if self.darwin {
                self.line(format!(".space {tail}"));
            } else {
                self.line(format!(".zero {tail}"));
            }
        }
        self.blank();
    }

    // ========================================================================
    // Instructions
    // ========================================================================

    /// Emit one instruction: a single TAB-indented line (the label pseudo
    /// prints at column zero).
    pub fn instr(&mut self, i: &Instr) {
        if let Instr::LabelDef(name) = i {
            self.raw(format!("{name}:"));
            return;
        }
        let text = self.format_instr(i);
        self.line(text);
    }

    #[allow(clippy::too_many_lines, reason = "one arm per catalogue entry")]
    fn format_instr(&self, i: &Instr) -> String {
        use Instr as I;

        match i {
            // Data processing.
            I::Add { is64, rd, rn, rm } => rrr("add", *is64, *rd, *rn, *rm),
            I::AddI { is64, rd, rn, imm } => rri("add", *is64, *rd, *rn, *imm),
            I::Sub { is64, rd, rn, rm } => rrr("sub", *is64, *rd, *rn, *rm),
            I::SubI { is64, rd, rn, imm } => rri("sub", *is64, *rd, *rn, *imm),
            I::Mul { is64, rd, rn, rm } => rrr("mul", *is64, *rd, *rn, *rm),
            I::Madd {
                is64,
                rd,
                rn,
                rm,
                ra,
            } => format!(
                "madd\t{}, {}, {}, {}",
                rd.name(*is64),
                rn.name(*is64),
                rm.name(*is64),
                ra.name(*is64)
            ),
            I::Smull { rd, rn, rm } => format!(
                "smull\t{}, {}, {}",
                rd.name(true),
                rn.name(false),
                rm.name(false)
            ),
            I::Umull { rd, rn, rm } => format!(
                "umull\t{}, {}, {}",
                rd.name(true),
                rn.name(false),
                rm.name(false)
            ),
            I::Sdiv { is64, rd, rn, rm } => rrr("sdiv", *is64, *rd, *rn, *rm),
            I::Udiv { is64, rd, rn, rm } => rrr("udiv", *is64, *rd, *rn, *rm),
            I::And { is64, rd, rn, rm } => rrr("and", *is64, *rd, *rn, *rm),
            I::AndI { is64, rd, rn, imm } => rri("and", *is64, *rd, *rn, *imm),
            I::Orr { is64, rd, rn, rm } => rrr("orr", *is64, *rd, *rn, *rm),
            I::OrrI { is64, rd, rn, imm } => rri("orr", *is64, *rd, *rn, *imm),
            I::Eor { is64, rd, rn, rm } => rrr("eor", *is64, *rd, *rn, *rm),
            I::EorI { is64, rd, rn, imm } => rri("eor", *is64, *rd, *rn, *imm),
            I::Mvn { is64, rd, rm } => {
                format!("mvn\t{}, {}", rd.name(*is64), rm.name(*is64))
            }
            I::Neg { is64, rd, rm } => {
                format!("neg\t{}, {}", rd.name(*is64), rm.name(*is64))
            }

            // Shifts.
            I::Lsl { is64, rd, rn, rm } => rrr("lsl", *is64, *rd, *rn, *rm),
            I::LslI { is64, rd, rn, imm } => rri("lsl", *is64, *rd, *rn, i64::from(*imm)),
            I::Lsr { is64, rd, rn, rm } => rrr("lsr", *is64, *rd, *rn, *rm),
            I::LsrI { is64, rd, rn, imm } => rri("lsr", *is64, *rd, *rn, i64::from(*imm)),
            I::Asr { is64, rd, rn, rm } => rrr("asr", *is64, *rd, *rn, *rm),
            I::AsrI { is64, rd, rn, imm } => rri("asr", *is64, *rd, *rn, i64::from(*imm)),
            I::Ror { is64, rd, rn, rm } => rrr("ror", *is64, *rd, *rn, *rm),
            I::RorI { is64, rd, rn, imm } => rri("ror", *is64, *rd, *rn, i64::from(*imm)),

            // Integer loads and stores.
            I::Ldr {
                is64,
                rt,
                base,
                offset,
            } => format!("ldr\t{}, {}", rt.name(*is64), mem(*base, *offset)),
            I::LdrR {
                is64,
                rt,
                base,
                index,
            } => format!(
                "ldr\t{}, [{}, {}]",
                rt.name(*is64),
                base.name(true),
                index.name(true)
            ),
            I::Ldrb { rt, base, offset } => {
                format!("ldrb\t{}, {}", rt.name(false), mem(*base, *offset))
            }
            I::Ldrh { rt, base, offset } => {
                format!("ldrh\t{}, {}", rt.name(false), mem(*base, *offset))
            }
            I::Ldrsb {
                is64,
                rt,
                base,
                offset,
            } => format!("ldrsb\t{}, {}", rt.name(*is64), mem(*base, *offset)),
            I::Ldrsh {
                is64,
                rt,
                base,
                offset,
            } => format!("ldrsh\t{}, {}", rt.name(*is64), mem(*base, *offset)),
            I::Ldrsw { rt, base, offset } => {
                format!("ldrsw\t{}, {}", rt.name(true), mem(*base, *offset))
            }
            I::Str {
                is64,
                rt,
                base,
                offset,
            } => format!("str\t{}, {}", rt.name(*is64), mem(*base, *offset)),
            I::StrR {
                is64,
                rt,
                base,
                index,
            } => format!(
                "str\t{}, [{}, {}]",
                rt.name(*is64),
                base.name(true),
                index.name(true)
            ),
            I::Strb { rt, base, offset } => {
                format!("strb\t{}, {}", rt.name(false), mem(*base, *offset))
            }
            I::Strh { rt, base, offset } => {
                format!("strh\t{}, {}", rt.name(false), mem(*base, *offset))
            }
            I::Ldp {
                is64,
                rt1,
                rt2,
                base,
                offset,
            } => format!(
                "ldp\t{}, {}, {}",
                rt1.name(*is64),
                rt2.name(*is64),
                mem(*base, *offset)
            ),
            I::Stp {
                is64,
                rt1,
                rt2,
                base,
                offset,
            } => format!(
                "stp\t{}, {}, {}",
                rt1.name(*is64),
                rt2.name(*is64),
                mem(*base, *offset)
            ),
            I::LdpPost {
                is64,
                rt1,
                rt2,
                base,
                offset,
            } => format!(
                "ldp\t{}, {}, [{}], #{}",
                rt1.name(*is64),
                rt2.name(*is64),
                base.name(true),
                offset
            ),
            I::StpPre {
                is64,
                rt1,
                rt2,
                base,
                offset,
            } => format!(
                "stp\t{}, {}, [{}, #{}]!",
                rt1.name(*is64),
                rt2.name(*is64),
                base.name(true),
                offset
            ),

            // Float loads and stores.
            I::FldrS { ft, base, offset } => {
                format!("ldr\t{}, {}", ft.name(false), mem(*base, *offset))
            }
            I::FldrD { ft, base, offset } => {
                format!("ldr\t{}, {}", ft.name(true), mem(*base, *offset))
            }
            I::FstrS { ft, base, offset } => {
                format!("str\t{}, {}", ft.name(false), mem(*base, *offset))
            }
            I::FstrD { ft, base, offset } => {
                format!("str\t{}, {}", ft.name(true), mem(*base, *offset))
            }

            // Branches.
            I::B { target, is_symbol } => format!("b\t{}", self.target(target, *is_symbol)),
            I::Bl { target, is_symbol } => format!("bl\t{}", self.target(target, *is_symbol)),
            I::Br { rn } => format!("br\t{}", rn.name(true)),
            I::Blr { rn } => format!("blr\t{}", rn.name(true)),
            I::Ret => "ret".to_string(),
            I::BCond { cond, target } => format!("b.{}\t{}", cond.name(), target),

            // Compares.
            I::Cmp { is64, rn, rm } => {
                format!("cmp\t{}, {}", rn.name(*is64), rm.name(*is64))
            }
            I::CmpI { is64, rn, imm } => format!("cmp\t{}, #{}", rn.name(*is64), imm),
            I::Cmn { is64, rn, rm } => {
                format!("cmn\t{}, {}", rn.name(*is64), rm.name(*is64))
            }
            I::CmnI { is64, rn, imm } => format!("cmn\t{}, #{}", rn.name(*is64), imm),
            I::Tst { is64, rn, rm } => {
                format!("tst\t{}, {}", rn.name(*is64), rm.name(*is64))
            }
            I::TstI { is64, rn, imm } => format!("tst\t{}, #{}", rn.name(*is64), imm),

            // Conditional select.
            I::Csel {
                is64,
                rd,
                rn,
                rm,
                cond,
            } => format!(
                "csel\t{}, {}, {}, {}",
                rd.name(*is64),
                rn.name(*is64),
                rm.name(*is64),
                cond.name()
            ),
            I::Cset { is64, rd, cond } => {
                format!("cset\t{}, {}", rd.name(*is64), cond.name())
            }
            I::Csinc {
                is64,
                rd,
                rn,
                rm,
                cond,
            } => format!(
                "csinc\t{}, {}, {}, {}",
                rd.name(*is64),
                rn.name(*is64),
                rm.name(*is64),
                cond.name()
            ),

            // Moves.
            I::Mov { is64, rd, rm } => {
                format!("mov\t{}, {}", rd.name(*is64), rm.name(*is64))
            }
            I::MovI { is64, rd, imm } => format!("mov\t{}, #{}", rd.name(*is64), imm),
            I::Movz {
                is64,
                rd,
                imm,
                shift,
            } => wide_move("movz", *is64, *rd, *imm, *shift),
            I::Movk {
                is64,
                rd,
                imm,
                shift,
            } => wide_move("movk", *is64, *rd, *imm, *shift),
            I::Movn {
                is64,
                rd,
                imm,
                shift,
            } => wide_move("movn", *is64, *rd, *imm, *shift),

            // Address computation.
            I::Adr { rd, label } => format!("adr\t{}, {}", rd.name(true), label),
            I::Adrp { rd, symbol } => {
                if self.darwin {
                    format!("adrp\t{}, {}@PAGE", rd.name(true), self.sym(symbol))
                } else {
                    format!("adrp\t{}, {}", rd.name(true), symbol)
                }
            }
            I::AddPageOff {
                rd,
                rn,
                symbol,
                offset,
            } => {
                if self.darwin {
                    let page_off = if *offset == 0 {
                        format!("{}@PAGEOFF", self.sym(symbol))
                    } else {
                        format!("{}@PAGEOFF+{}", self.sym(symbol), offset)
                    };
                    format!("add\t{}, {}, {}", rd.name(true), rn.name(true), page_off)
                } else {
                    format!("add\t{}, {}, #{}", rd.name(true), rn.name(true), offset)
                }
            }

            // Float data processing.
            I::Fadd {
                is_double,
                rd,
                rn,
                rm,
            } => fff("fadd", *is_double, *rd, *rn, *rm),
            I::Fsub {
                is_double,
                rd,
                rn,
                rm,
            } => fff("fsub", *is_double, *rd, *rn, *rm),
            I::Fmul {
                is_double,
                rd,
                rn,
                rm,
            } => fff("fmul", *is_double, *rd, *rn, *rm),
            I::Fdiv {
                is_double,
                rd,
                rn,
                rm,
            } => fff("fdiv", *is_double, *rd, *rn, *rm),
            I::Fneg { is_double, rd, rn } => {
                format!("fneg\t{}, {}", rd.name(*is_double), rn.name(*is_double))
            }
            I::Fabs { is_double, rd, rn } => {
                format!("fabs\t{}, {}", rd.name(*is_double), rn.name(*is_double))
            }
            I::Fsqrt { is_double, rd, rn } => {
                format!("fsqrt\t{}, {}", rd.name(*is_double), rn.name(*is_double))
            }
            I::Fmov { is_double, rd, rn } => {
                format!("fmov\t{}, {}", rd.name(*is_double), rn.name(*is_double))
            }
            I::FmovI { is_double, rd, imm } => {
                format!("fmov\t{}, #{:?}", rd.name(*is_double), imm)
            }

            // Float conversions.
            I::Scvtf {
                is_double,
                is64,
                rd,
                rn,
            } => format!("scvtf\t{}, {}", rd.name(*is_double), rn.name(*is64)),
            I::Ucvtf {
                is_double,
                is64,
                rd,
                rn,
            } => format!("ucvtf\t{}, {}", rd.name(*is_double), rn.name(*is64)),
            I::Fcvtzs {
                is64,
                is_double,
                rd,
                rn,
            } => format!("fcvtzs\t{}, {}", rd.name(*is64), rn.name(*is_double)),
            I::Fcvtzu {
                is64,
                is_double,
                rd,
                rn,
            } => format!("fcvtzu\t{}, {}", rd.name(*is64), rn.name(*is_double)),
            I::Fcvt { to_double, rd, rn } => {
                format!("fcvt\t{}, {}", rd.name(*to_double), rn.name(!*to_double))
            }

            // Float compare.
            I::Fcmp { is_double, rn, rm } => {
                format!("fcmp\t{}, {}", rn.name(*is_double), rm.name(*is_double))
            }
            I::FcmpZ { is_double, rn } => format!("fcmp\t{}, #0.0", rn.name(*is_double)),

            // Extensions.
            I::Sxtb { is64, rd, rn } => {
                format!("sxtb\t{}, {}", rd.name(*is64), rn.name(false))
            }
            I::Sxth { is64, rd, rn } => {
                format!("sxth\t{}, {}", rd.name(*is64), rn.name(false))
            }
            I::Sxtw { rd, rn } => format!("sxtw\t{}, {}", rd.name(true), rn.name(false)),
            I::Uxtb { rd, rn } => format!("uxtb\t{}, {}", rd.name(false), rn.name(false)),
            I::Uxth { rd, rn } => format!("uxth\t{}, {}", rd.name(false), rn.name(false)),

            I::LabelDef(name) => format!("{name}:"),
        }
    }
}

/// `[base]` or `[base, #offset]`.
fn mem(base: IReg, offset: i64) -> String {
    if offset == 0 {
        format!("[{}]", base.name(true))
    } else {
        format!("[{}, #{}]", base.name(true), offset)
    }
}

fn rrr(mnemonic: &str, is64: bool, rd: IReg, rn: IReg, rm: IReg) -> String {
    format!(
        "{mnemonic}\t{}, {}, {}",
        rd.name(is64),
        rn.name(is64),
        rm.name(is64)
    )
}

fn rri(mnemonic: &str, is64: bool, rd: IReg, rn: IReg, imm: i64) -> String {
    format!("{mnemonic}\t{}, {}, #{imm}", rd.name(is64), rn.name(is64))
}

fn fff(mnemonic: &str, is_double: bool, rd: FReg, rn: FReg, rm: FReg) -> String {
    format!(
        "{mnemonic}\t{}, {}, {}",
        rd.name(is_double),
        rn.name(is_double),
        rm.name(is_double)
    )
}

fn wide_move(mnemonic: &str, is64: bool, rd: IReg, imm: u16, shift: u8) -> String {
    if shift == 0 {
        format!("{mnemonic}\t{}, #{imm}", rd.name(is64))
    } else {
        format!("{mnemonic}\t{}, #{imm}, lsl #{shift}", rd.name(is64))
    }
}
