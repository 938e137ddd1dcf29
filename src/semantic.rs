//! Semantic evaluator (component F): the attribute-grammar-style actions
//! scheduled by the predictive analyzer, plus the snapshot registers that
//! carry identifier context across a production's right-hand side.
//!
//! Each action is a plain function dispatched by `SemanticAction` tag
//! through [`dispatch`] — the "dynamic dispatch on stack items" design this
//! evaluator settled on (no closures captured at schedule time, so the
//! snapshot registers below are load-bearing, not incidental).

use crate::attributes::AttrVal;
use crate::report::ErrorReporter;
use crate::symbols::{SymbolKind, SymbolTable, TypeTag};

/// One scheduled semantic action, tagged by which production triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticAction {
    InitGlobal,
    LcCheck,
    LcIf,
    LeLambda,
    FunInit,
    FunDef,
    FunEnd,
    CuerpoLc,
    CuerpoLambda,
    ArgsId,
    ArgsRes,
    ArgsVoid,
    ArgMoreId,
    ArgMoreRes,
    ArgMoreLambda,
    ArgsLCall,
    ArgsLLambda,
    ArgMoreCall,
    LsLetId,
    LsLetRes,
    LsIdPre,
    LsIdRes,
    LsRead,
    LsWrite,
    LsReturn,
    IdOptCall,
    IdOptPlusEq,
    TypeVoid,
    TypeInt,
    TypeFloat,
    TypeString,
    TypeBool,
    AsignLambda,
    RetLambda,
    ExpLogic,
    ExpAuxAnd,
    ExpAuxLambda,
    Exp1Rel,
    Exp1AuxMin,
    Exp1AuxLambda,
    Exp2Arit,
    Exp2AuxSum,
    Exp2AuxLambda,
    Exp3IdPre,
    Exp3Id,
    Exp4Call,
    Exp4Lambda,
}

/// Returns the `(slot, action)` schedule for a production, indexed by this
/// crate's own `Gramatica.txt` numbering (see `DESIGN.md`). An empty slice
/// means the production has no semantic action of its own (either it is
/// purely structural, like `CuerpoIf`, or its action is a no-op that this
/// crate does not bother scheduling).
pub fn actions_for(production_number: u32) -> &'static [(u32, SemanticAction)] {
    use SemanticAction::*;
    match production_number {
        1 => &[(0, InitGlobal)],
        2 => &[(0, InitGlobal)],
        3 => &[(0, InitGlobal)],
        4 => &[(2, LcCheck)],
        5 => &[(6, LcIf)],
        7 => &[(1, LeLambda)],
        8 => &[(3, FunInit), (6, FunDef), (9, FunEnd)],
        10 => &[(2, CuerpoLc)],
        11 => &[(1, CuerpoLambda)],
        12 => &[(2, ArgsId), (3, ArgsRes)],
        13 => &[(1, ArgsVoid)],
        14 => &[(3, ArgMoreId), (4, ArgMoreRes)],
        15 => &[(1, ArgMoreLambda)],
        16 => &[(2, ArgsLCall)],
        17 => &[(1, ArgsLLambda)],
        18 => &[(3, ArgMoreCall)],
        19 => &[(1, ArgMoreLambda)],
        20 => &[(3, LsLetId), (4, LsLetRes)],
        21 => &[(1, LsIdPre), (2, LsIdRes)],
        22 => &[(2, LsRead)],
        23 => &[(2, LsWrite)],
        24 => &[(2, LsReturn)],
        25 => &[(3, IdOptCall)],
        27 => &[(2, IdOptPlusEq)],
        28 => &[(1, TypeVoid)],
        30 => &[(1, TypeInt)],
        31 => &[(1, TypeFloat)],
        32 => &[(1, TypeString)],
        33 => &[(1, TypeBool)],
        35 => &[(1, AsignLambda)],
        37 => &[(1, RetLambda)],
        38 => &[(2, ExpLogic)],
        39 => &[(2, ExpAuxAnd)],
        40 => &[(1, ExpAuxLambda)],
        41 => &[(2, Exp1Rel)],
        42 => &[(2, Exp1AuxMin)],
        43 => &[(1, Exp1AuxLambda)],
        44 => &[(2, Exp2Arit)],
        45 => &[(2, Exp2AuxSum)],
        46 => &[(1, Exp2AuxLambda)],
        48 => &[(1, TypeInt)],
        49 => &[(1, TypeFloat)],
        50 => &[(1, TypeString)],
        51 => &[(1, TypeBool)],
        52 => &[(1, TypeBool)],
        53 => &[(1, Exp3IdPre), (2, Exp3Id)],
        54 => &[(3, Exp4Call)],
        55 => &[(1, Exp4Lambda)],
        _ => &[],
    }
}

/// Global mutable semantic state, shared across the whole analysis
/// (`spec.md` §9's "one explicit context object" design note).
#[derive(Debug, Default)]
pub struct SemState {
    pub attrs: Vec<AttrVal>,
    pub last_id_pos: Option<u32>,
    pub id_stack: Vec<u32>,
    pub decl_id_stack: Vec<u32>,
    pub ls_id_stack: Vec<u32>,
    pub desp_g: u32,
    pub desp_l: u32,
    pub in_function: bool,
    pub current_func_id: Option<u32>,
    pub global_initialized: bool,
}

impl SemState {
    pub fn new() -> Self {
        Self::default()
    }

    fn pop(&mut self) -> AttrVal {
        self.attrs.pop().expect("attribute stack underflow")
    }

    fn push(&mut self, v: AttrVal) {
        self.attrs.push(v);
    }
}

pub fn dispatch(action: SemanticAction, state: &mut SemState, symbols: &mut SymbolTable, errors: &mut ErrorReporter) {
    use SemanticAction::*;
    match action {
        InitGlobal => {
            if !state.global_initialized {
                state.desp_g = 0;
                state.attrs.clear();
                state.id_stack.clear();
                state.decl_id_stack.clear();
                state.global_initialized = true;
            }
        }
        LcCheck => {
            let ls_type = state.pop();
            state.push(if ls_type.is_error() { AttrVal::Error } else { AttrVal::Ok });
        }
        LcIf => {
            let le_type = state.pop();
            let cuerpo_type = state.pop();
            let exp_type = state.pop();
            if exp_type == AttrVal::Primitive(TypeTag::Bool) {
                if cuerpo_type == AttrVal::Ok {
                    state.push(le_type);
                } else {
                    state.push(AttrVal::Error);
                }
            } else {
                errors.report_semantic(&format!("'if' condition requires boolean, got {:?}", exp_type));
                state.push(AttrVal::Error);
            }
        }
        LeLambda => state.push(AttrVal::Ok),
        FunInit => {
            state.current_func_id = state.last_id_pos;
            symbols.enter_scope();
            state.desp_l = 0;
            state.in_function = true;
        }
        FunDef => {
            let args_type = state.pop();
            let ret_type = state.pop().as_primitive();
            let args = match args_type {
                AttrVal::Args(args) => args,
                other => panic!("FunDef: expected Args, got {:?}", other),
            };
            if let Some(func_id) = state.current_func_id {
                symbols.set_kind(func_id, SymbolKind::Function { args, ret: ret_type });
            }
        }
        FunEnd => {
            symbols.exit_scope();
            state.in_function = false;
        }
        CuerpoLc => {
            let c1 = state.pop();
            let lc = state.pop();
            state.push(if lc == AttrVal::Ok { c1 } else { AttrVal::Error });
        }
        CuerpoLambda => state.push(AttrVal::Ok),
        ArgsId => {
            let tipo = match state.attrs.last().expect("Tipo must be on the stack") {
                AttrVal::Primitive(t) => *t,
                other => panic!("Args: expected Primitive Tipo, got {:?}", other),
            };
            if let Some(pos) = state.last_id_pos {
                symbols.set_kind(pos, SymbolKind::Primitive(tipo));
                symbols.set_displacement(pos, state.desp_l);
                state.desp_l += tipo.width();
            }
        }
        ArgsRes => {
            let am = state.pop();
            let t = state.pop().as_primitive();
            let mut args = vec![t];
            if let AttrVal::Args(mut rest) = am {
                args.append(&mut rest);
            }
            state.push(AttrVal::Args(args));
        }
        ArgsVoid => state.push(AttrVal::Args(vec![])),
        ArgMoreId => {
            let tipo = match state.attrs.last().expect("Tipo must be on the stack") {
                AttrVal::Primitive(t) => *t,
                other => panic!("ArgMore: expected Primitive Tipo, got {:?}", other),
            };
            if let Some(pos) = state.last_id_pos {
                symbols.set_kind(pos, SymbolKind::Primitive(tipo));
                symbols.set_displacement(pos, state.desp_l);
                state.desp_l += tipo.width();
            }
        }
        ArgMoreRes => {
            let am1 = state.pop();
            let t = state.pop().as_primitive();
            let mut args = vec![t];
            if let AttrVal::Args(mut rest) = am1 {
                args.append(&mut rest);
            }
            state.push(AttrVal::Args(args));
        }
        ArgMoreLambda => state.push(AttrVal::Args(vec![])),
        ArgsLCall => {
            let am = state.pop();
            let e = state.pop();
            if e.is_error() {
                state.push(AttrVal::Error);
            } else {
                let mut args = vec![e.as_primitive()];
                if let AttrVal::Args(mut rest) = am {
                    args.append(&mut rest);
                }
                state.push(AttrVal::Args(args));
            }
        }
        ArgsLLambda => state.push(AttrVal::Args(vec![])),
        ArgMoreCall => {
            let am1 = state.pop();
            let e = state.pop();
            if e.is_error() {
                state.push(AttrVal::Error);
            } else {
                let mut args = vec![e.as_primitive()];
                if let AttrVal::Args(mut rest) = am1 {
                    args.append(&mut rest);
                }
                state.push(AttrVal::Args(args));
            }
        }
        LsLetId => {
            let tipo = match state.attrs.last().expect("Tipo must be on the stack") {
                AttrVal::Primitive(t) => *t,
                other => panic!("let: expected Primitive Tipo, got {:?}", other),
            };
            if let Some(pos) = state.last_id_pos {
                symbols.set_kind(pos, SymbolKind::Primitive(tipo));
                if state.in_function {
                    symbols.set_displacement(pos, state.desp_l);
                    state.desp_l += tipo.width();
                } else {
                    symbols.set_displacement(pos, state.desp_g);
                    state.desp_g += tipo.width();
                }
                state.decl_id_stack.push(pos);
            }
        }
        LsLetRes => {
            let asign = state.pop();
            let tipo = state.pop().as_primitive();
            let decl_id = state.decl_id_stack.pop().or(state.last_id_pos);
            let name = decl_id.map(|p| symbols.name_of(p)).unwrap_or_default();
            match asign {
                AttrVal::Error => state.push(AttrVal::Error),
                AttrVal::Void => state.push(AttrVal::Primitive(tipo)),
                AttrVal::Primitive(t) if t == tipo => state.push(AttrVal::Primitive(tipo)),
                AttrVal::Primitive(TypeTag::Int) if tipo == TypeTag::Float => {
                    state.push(AttrVal::Primitive(TypeTag::Float))
                }
                other => {
                    errors.report_semantic(&format!(
                        "bad assignment in 'let {}'. expected {}, got {:?}",
                        name, tipo, other
                    ));
                    state.push(AttrVal::Error);
                }
            }
        }
        LsIdPre => {
            let pos = state.last_id_pos.expect("id terminal must set last_id_pos");
            state.ls_id_stack.push(pos);
            if symbols.kind(pos).map(|k| matches!(k, SymbolKind::Unset)).unwrap_or(true) {
                symbols.set_kind(pos, SymbolKind::Primitive(TypeTag::Int));
                symbols.set_displacement(pos, state.desp_g);
                state.desp_g += TypeTag::Int.width();
            }
        }
        LsIdRes => {
            let idopt = state.pop();
            let id_pos = state.ls_id_stack.pop().or(state.last_id_pos);
            let sym_kind = id_pos.and_then(|p| symbols.kind(p)).cloned();
            let name = id_pos.map(|p| symbols.name_of(p)).unwrap_or_default();
            match idopt {
                AttrVal::Error => state.push(AttrVal::Error),
                AttrVal::Ok => match sym_kind {
                    Some(SymbolKind::Function { ret, .. }) => {
                        if ret == TypeTag::Void {
                            state.push(AttrVal::Ok);
                        } else {
                            state.push(AttrVal::Primitive(ret));
                        }
                    }
                    _ => state.push(AttrVal::Ok),
                },
                other => match sym_kind {
                    Some(SymbolKind::Function { .. }) => state.push(other),
                    Some(SymbolKind::Primitive(t)) if AttrVal::Primitive(t) == other => {
                        state.push(AttrVal::Primitive(t))
                    }
                    Some(SymbolKind::Primitive(TypeTag::Float)) if other == AttrVal::Primitive(TypeTag::Int) => {
                        state.push(AttrVal::Primitive(TypeTag::Float))
                    }
                    _ => {
                        errors.report_semantic(&format!(
                            "bad assignment to '{}'. variable is {:?}, value is {:?}",
                            name, sym_kind, other
                        ));
                        state.push(AttrVal::Error);
                    }
                },
            }
        }
        LsRead => state.push(AttrVal::Ok),
        LsWrite => {
            let t = state.pop();
            match t {
                AttrVal::Primitive(TypeTag::Int) | AttrVal::Primitive(TypeTag::Float) | AttrVal::Primitive(TypeTag::String) => {
                    state.push(AttrVal::Ok);
                }
                other => {
                    errors.report_semantic(&format!("write() does not support type {:?}", other));
                    state.push(AttrVal::Error);
                }
            }
        }
        LsReturn => {
            let t = state.pop();
            state.push(t);
        }
        IdOptCall => {
            let args_llamada = state.pop();
            let func_id = state.ls_id_stack.last().copied().or(state.last_id_pos);
            let sym_kind = func_id.and_then(|p| symbols.kind(p)).cloned();
            let name = func_id.map(|p| symbols.name_of(p)).unwrap_or_default();
            match sym_kind {
                None | Some(SymbolKind::Unset) => {
                    errors.report_semantic(&format!("undeclared function: {}", name));
                    state.push(AttrVal::Error);
                }
                Some(SymbolKind::Primitive(t)) => {
                    errors.report_semantic(&format!("'{}' is not a function (it is {})", name, t));
                    state.push(AttrVal::Error);
                }
                Some(SymbolKind::Function { args, .. }) => {
                    let passed = match args_llamada {
                        AttrVal::Args(passed) => passed,
                        AttrVal::Error => {
                            state.push(AttrVal::Error);
                            return;
                        }
                        other => panic!("IdOptCall: unexpected ArgsLlamada value {:?}", other),
                    };
                    if passed == args {
                        state.push(AttrVal::Ok);
                    } else {
                        errors.report_semantic(&format!(
                            "call to '{}': incompatible arguments. expected {:?}, got {:?}",
                            name, args, passed
                        ));
                        state.push(AttrVal::Error);
                    }
                }
            }
        }
        IdOptPlusEq => {
            let t = state.pop();
            if t.is_numeric() {
                state.push(t);
            } else {
                errors.report_semantic("operator += requires a numeric type");
                state.push(AttrVal::Error);
            }
        }
        TypeVoid => state.push(AttrVal::Primitive(TypeTag::Void)),
        TypeInt => state.push(AttrVal::Primitive(TypeTag::Int)),
        TypeFloat => state.push(AttrVal::Primitive(TypeTag::Float)),
        TypeString => state.push(AttrVal::Primitive(TypeTag::String)),
        TypeBool => state.push(AttrVal::Primitive(TypeTag::Bool)),
        AsignLambda => state.push(AttrVal::Void),
        RetLambda => state.push(AttrVal::Primitive(TypeTag::Void)),
        ExpLogic => {
            let aux = state.pop();
            let e1 = state.pop();
            if aux == AttrVal::Void {
                state.push(e1);
            } else if aux == AttrVal::Primitive(TypeTag::Bool) && e1 == AttrVal::Primitive(TypeTag::Bool) {
                state.push(AttrVal::Primitive(TypeTag::Bool));
            } else if aux == e1 {
                state.push(AttrVal::Primitive(TypeTag::Bool));
            } else {
                state.push(AttrVal::Error);
            }
        }
        ExpAuxAnd => {
            let t = state.pop();
            state.push(if t == AttrVal::Primitive(TypeTag::Bool) {
                AttrVal::Primitive(TypeTag::Bool)
            } else {
                AttrVal::Error
            });
        }
        ExpAuxLambda => state.push(AttrVal::Void),
        Exp1Rel => {
            let aux = state.pop();
            let e2 = state.pop();
            if aux == AttrVal::Void {
                state.push(e2);
            } else if aux == AttrVal::Primitive(TypeTag::Bool) {
                state.push(AttrVal::Primitive(TypeTag::Bool));
            } else {
                state.push(AttrVal::Error);
            }
        }
        Exp1AuxMin => {
            let t = state.pop();
            if t.is_numeric() {
                state.push(AttrVal::Primitive(TypeTag::Bool));
            } else {
                errors.report_semantic(&format!("operator < requires numeric operands, got {:?}", t));
                state.push(AttrVal::Error);
            }
        }
        Exp1AuxLambda => state.push(AttrVal::Void),
        Exp2Arit => {
            let aux = state.pop();
            let e3 = state.pop();
            if aux == AttrVal::Void {
                state.push(e3);
            } else if aux == e3 {
                state.push(e3);
            } else if (e3 == AttrVal::Primitive(TypeTag::Float) && aux == AttrVal::Primitive(TypeTag::Int))
                || (e3 == AttrVal::Primitive(TypeTag::Int) && aux == AttrVal::Primitive(TypeTag::Float))
            {
                state.push(AttrVal::Primitive(TypeTag::Float));
            } else {
                state.push(AttrVal::Error);
            }
        }
        Exp2AuxSum => {
            let t = state.pop();
            state.push(if t.is_numeric() { t } else { AttrVal::Error });
        }
        Exp2AuxLambda => state.push(AttrVal::Void),
        Exp3IdPre => {
            let pos = state.last_id_pos.expect("id terminal must set last_id_pos");
            state.id_stack.push(pos);
        }
        Exp3Id => {
            let e4 = state.pop();
            let id_pos = state.id_stack.pop().or(state.last_id_pos).expect("id position");
            let mut sym_kind = symbols.kind(id_pos).cloned();
            if matches!(sym_kind, None | Some(SymbolKind::Unset)) {
                symbols.set_kind(id_pos, SymbolKind::Primitive(TypeTag::Int));
                symbols.set_displacement(id_pos, state.desp_g);
                state.desp_g += TypeTag::Int.width();
                sym_kind = Some(SymbolKind::Primitive(TypeTag::Int));
            }
            let name = symbols.name_of(id_pos);
            match e4 {
                AttrVal::Void => match sym_kind {
                    Some(SymbolKind::Function { .. }) => {
                        errors.report_semantic(&format!("use of function '{}' without parentheses", name));
                        state.push(AttrVal::Error);
                    }
                    Some(SymbolKind::Primitive(t)) => state.push(AttrVal::Primitive(t)),
                    _ => state.push(AttrVal::Error),
                },
                AttrVal::Call(args_tipo) => match sym_kind {
                    Some(SymbolKind::Function { args, ret }) => {
                        if args_tipo == args {
                            state.push(AttrVal::Primitive(ret));
                        } else {
                            errors.report_semantic(&format!(
                                "call to '{}': incompatible arguments. expected {:?}, got {:?}",
                                name, args, args_tipo
                            ));
                            state.push(AttrVal::Error);
                        }
                    }
                    Some(SymbolKind::Primitive(t)) => {
                        errors.report_semantic(&format!("'{}' is not a function (it is {})", name, t));
                        state.push(AttrVal::Error);
                    }
                    _ => state.push(AttrVal::Error),
                },
                other => panic!("Exp3Id: unexpected Expresion4 value {:?}", other),
            }
        }
        Exp4Call => {
            let args_tipo = state.pop();
            let args = match args_tipo {
                AttrVal::Args(args) => args,
                AttrVal::Error => {
                    state.push(AttrVal::Call(vec![]));
                    return;
                }
                other => panic!("Exp4Call: unexpected ArgsLlamada value {:?}", other),
            };
            state.push(AttrVal::Call(args));
        }
        Exp4Lambda => state.push(AttrVal::Void),
    }
}
