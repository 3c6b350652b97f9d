use std::time::{SystemTime, UNIX_EPOCH};
use crate::interpreter::evaluator::Interpreter;
use crate::interpreter::value::Value;

pub fn define_natives(interpreter: &mut Interpreter) {
    interpreter.define_native("clock", 0, clock);
}

/// Seconds since the Unix epoch.
fn clock(_interpreter: &mut Interpreter, _arguments: &[Value]) -> Result<Value, String> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| Value::Number(duration.as_secs_f64()))
        .map_err(|err| format!("Clock error: {}", err))
}
