use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use crate::interpreter::evaluator::Interpreter;

/// An in-memory sink whose contents stay readable after a clone was handed to the interpreter.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_owned).collect()
    }
}

/// An interpreter printing into a [`SharedOutput`].
pub fn interpreter() -> (Interpreter, SharedOutput) {
    let output = SharedOutput::default();
    (Interpreter::with_output(Box::new(output.clone())), output)
}
