//! Small evaluator for generated method bodies, used by tests to check the
//! runtime behavior of emitted code.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ir::{BinaryOp, Expr, MethodSpec, Stmt, ValueComparison};

#[derive(Debug, PartialEq)]
pub struct Object {
    pub class: String,
    pub fields: Vec<(String, Value)>,
}

/// Runtime value. Arrays and objects have reference identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Array(Rc<Vec<Value>>),
    Object(Rc<RefCell<Object>>),
}

impl Value {
    pub fn object(class: &str, fields: Vec<(&str, Value)>) -> Self {
        Value::Object(Rc::new(RefCell::new(Object {
            class: class.to_string(),
            fields: fields.into_iter().map(|(n, v)| (n.to_string(), v)).collect(),
        })))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    pub fn same_object(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn get(&self, name: &str) -> Value {
        match self {
            Value::Object(object) => object
                .borrow()
                .fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| panic!("no field {name}")),
            other => panic!("field {name} of non-object {other:?}"),
        }
    }

    fn set(&self, name: &str, value: Value) {
        match self {
            Value::Object(object) => {
                let mut object = object.borrow_mut();
                match object.fields.iter_mut().find(|(n, _)| n == name) {
                    Some(slot) => slot.1 = value,
                    None => object.fields.push((name.to_string(), value)),
                }
            }
            other => panic!("assignment to field {name} of {other:?}"),
        }
    }

    fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            other => panic!("expected a boolean, got {other:?}"),
        }
    }

    fn as_int(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            other => panic!("expected an integer, got {other:?}"),
        }
    }

    fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(Value::render).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Object(object) => object.borrow().class.clone(),
        }
    }
}

fn equal(a: &Value, b: &Value, comparison: ValueComparison) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => match comparison {
            ValueComparison::Structural | ValueComparison::Identity => Rc::ptr_eq(x, y),
            ValueComparison::ShallowContent => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| equal(l, r, ValueComparison::Structural))
            }
            ValueComparison::DeepContent => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| equal(l, r, ValueComparison::DeepContent))
            }
        },
        (Value::Object(x), Value::Object(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.class == y.class
                && x.fields.len() == y.fields.len()
                && x.fields
                    .iter()
                    .zip(y.fields.iter())
                    .all(|((n1, v1), (n2, v2))| n1 == n2 && equal(v1, v2, ValueComparison::Structural))
        }
        _ => a == b,
    }
}

fn hash(value: &Value, comparison: ValueComparison) -> i64 {
    let combine = |items: &mut dyn Iterator<Item = i64>| items.fold(1i64, |h, v| h.wrapping_mul(31).wrapping_add(v));
    match value {
        Value::Null => 0,
        Value::Bool(b) => {
            if *b {
                1231
            } else {
                1237
            }
        }
        Value::Int(n) => *n,
        Value::Str(s) => s.chars().fold(0i64, |h, c| h.wrapping_mul(31).wrapping_add(c as i64)),
        Value::Array(items) => match comparison {
            ValueComparison::Structural | ValueComparison::Identity => Rc::as_ptr(items) as usize as i64,
            ValueComparison::ShallowContent => combine(&mut items.iter().map(|v| hash(v, ValueComparison::Structural))),
            ValueComparison::DeepContent => combine(&mut items.iter().map(|v| hash(v, ValueComparison::DeepContent))),
        },
        Value::Object(object) => combine(&mut object.borrow().fields.iter().map(|(_, v)| hash(v, ValueComparison::Structural))),
    }
}

fn compare(a: &Value, b: &Value) -> i64 {
    let ordering = match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (x, y) => panic!("cannot compare {x:?} with {y:?}"),
    };
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

fn literal(source: &str) -> Value {
    match source {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "\"\"" => Value::Str(String::new()),
        other => match other.trim_end_matches('L').parse() {
            Ok(n) => Value::Int(n),
            Err(_) => panic!("unsupported literal {other}"),
        },
    }
}

struct Frame<'i> {
    interp: &'i Interpreter,
    this: Value,
    locals: HashMap<String, Value>,
}

impl Frame<'_> {
    fn eval(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::This => self.this.clone(),
            Expr::Null => Value::Null,
            Expr::Bool { value } => Value::Bool(*value),
            Expr::Int { value } => Value::Int(*value),
            Expr::Str { value } => Value::Str(value.clone()),
            Expr::Literal { source } => literal(source),
            Expr::Ident { name } => self
                .locals
                .get(name)
                .cloned()
                .unwrap_or_else(|| panic!("unbound {name}")),
            Expr::Field { receiver, name } => self.eval(receiver).get(name),
            Expr::Call {
                receiver,
                method,
                args,
            } => {
                let receiver = match receiver {
                    Some(receiver) => self.eval(receiver),
                    None => self.this.clone(),
                };
                let args: Vec<Value> = args.iter().map(|arg| self.eval(arg)).collect();
                self.interp.invoke(&receiver, method, &args)
            }
            Expr::Construct { class, args } => {
                let fields = args
                    .iter()
                    .map(|arg| (arg.name.clone(), self.eval(&arg.value)))
                    .collect();
                Value::Object(Rc::new(RefCell::new(Object {
                    class: class.clone(),
                    fields,
                })))
            }
            Expr::Binary { left, op, right } => {
                let left = self.eval(left);
                match op {
                    BinaryOp::Or => Value::Bool(left.as_bool() || self.eval(right).as_bool()),
                    BinaryOp::Eq => Value::Bool(equal(&left, &self.eval(right), ValueComparison::Structural)),
                    BinaryOp::NotEq => Value::Bool(!equal(&left, &self.eval(right), ValueComparison::Structural)),
                    BinaryOp::RefEq => {
                        let right = self.eval(right);
                        Value::Bool(left.same_object(&right) || (!matches!(left, Value::Object(_) | Value::Array(_)) && left == right))
                    }
                    BinaryOp::Add => Value::Int(left.as_int().wrapping_add(self.eval(right).as_int())),
                    BinaryOp::Mul => Value::Int(left.as_int().wrapping_mul(self.eval(right).as_int())),
                }
            }
            Expr::Not { operand } => Value::Bool(!self.eval(operand).as_bool()),
            Expr::Cast { value, .. } => self.eval(value),
            Expr::SameClass { left, right } => {
                let (left, right) = (self.eval(left), self.eval(right));
                match (&left, &right) {
                    (Value::Object(a), Value::Object(b)) => Value::Bool(a.borrow().class == b.borrow().class),
                    _ => Value::Bool(false),
                }
            }
            Expr::Equal {
                left,
                right,
                comparison,
            } => {
                let (left, right) = (self.eval(left), self.eval(right));
                Value::Bool(equal(&left, &right, *comparison))
            }
            Expr::HashOf { value, comparison, .. } => Value::Int(hash(&self.eval(value), *comparison)),
            Expr::Compare { left, right } => {
                let (left, right) = (self.eval(left), self.eval(right));
                Value::Int(compare(&left, &right))
            }
            Expr::Concat { parts } => Value::Str(parts.iter().map(|p| self.eval(p).render()).collect()),
        }
    }

    fn exec(&mut self, body: &[Stmt]) -> Option<Value> {
        for stmt in body {
            match stmt {
                Stmt::Let { name, value, .. } => {
                    let value = self.eval(value);
                    self.locals.insert(name.clone(), value);
                }
                Stmt::Assign { target, value } => {
                    let value = self.eval(value);
                    match target {
                        Expr::Ident { name } => {
                            self.locals.insert(name.clone(), value);
                        }
                        Expr::Field { receiver, name } => self.eval(receiver).set(name, value),
                        other => panic!("cannot assign to {other:?}"),
                    }
                }
                Stmt::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    let branch = if self.eval(condition).as_bool() {
                        Some(then_branch)
                    } else {
                        else_branch.as_ref()
                    };
                    if let Some(result) = branch.and_then(|b| self.exec(b)) {
                        return Some(result);
                    }
                }
                Stmt::Return { value } => return Some(self.eval(value)),
                Stmt::Expr { expr } => {
                    self.eval(expr);
                }
                Stmt::Comment { .. } => {}
            }
        }
        None
    }
}

/// Runs method bodies. Methods called from inside a body are looked up by
/// the receiver's class.
#[derive(Debug, Default)]
pub struct Interpreter {
    methods: HashMap<(String, String), MethodSpec>,
}

impl Interpreter {
    /// Makes `method` callable on objects of `class`.
    pub fn define(&mut self, class: &str, method: MethodSpec) {
        self.methods.insert((class.to_string(), method.name.clone()), method);
    }

    fn frame(&self, this: &Value) -> Frame<'_> {
        Frame {
            interp: self,
            this: this.clone(),
            locals: HashMap::new(),
        }
    }

    fn invoke(&self, receiver: &Value, name: &str, args: &[Value]) -> Value {
        let class = match receiver {
            Value::Object(object) => object.borrow().class.clone(),
            other => panic!("call {name} on non-object {other:?}"),
        };
        let method = self
            .methods
            .get(&(class.clone(), name.to_string()))
            .unwrap_or_else(|| panic!("no method {class}.{name}"));
        self.call(method, receiver, args)
    }

    /// Calls a method with positional arguments.
    pub fn call(&self, method: &MethodSpec, this: &Value, args: &[Value]) -> Value {
        let mut frame = self.frame(this);
        for (param, arg) in method.params.iter().zip(args) {
            frame.locals.insert(param.name.clone(), arg.clone());
        }
        frame.exec(&method.body).unwrap_or(Value::Null)
    }

    /// Calls a method with named arguments; omitted parameters take their
    /// default.
    pub fn call_named(&self, method: &MethodSpec, this: &Value, args: &[(&str, Value)]) -> Value {
        let mut frame = self.frame(this);
        for param in &method.params {
            let value = match args.iter().find(|(name, _)| *name == param.name) {
                Some((_, value)) => value.clone(),
                None => {
                    let default = param
                        .default
                        .as_ref()
                        .unwrap_or_else(|| panic!("missing argument {}", param.name));
                    frame.eval(default)
                }
            };
            frame.locals.insert(param.name.clone(), value);
        }
        frame.exec(&method.body).unwrap_or(Value::Null)
    }
}
