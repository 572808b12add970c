#[cfg(test)]
mod tests {
    use funl_core::parser::{LineSource, RuntimeError};
    use funl_core::{EvalConfig, FunlError, Interpreter, Tree};

    const PROGRAM: &str = r#"
// Arithmetic helpers
def square x = x * x end

def abs x =
    if x then x else 0 - x end
end

/* Recursive factorial */
def fact n =
    if n then n * fact(n - 1) else 1 end
end

def fib n =
    if n - 1 then fib(n - 1) + fib(n - 2) else n end
end

def hypot2 a b = val sa = square(a), val sb = square(b), sa + sb end

def apply f x = f(x) end
"#;

    fn session() -> Interpreter {
        let mut funl = Interpreter::new();
        funl.define(PROGRAM).unwrap();
        funl
    }

    fn run(funl: &mut Interpreter, line: &str) -> String {
        funl.eval_line(line).unwrap().to_string()
    }

    #[test]
    fn test_program_loads_every_function() {
        let funl = session();
        assert_eq!(
            funl.function_names(),
            vec!["abs", "apply", "fact", "fib", "hypot2", "square"]
        );
    }

    #[test]
    fn test_recursive_programs() {
        let mut funl = session();
        assert_eq!(run(&mut funl, "fact(5)"), "120.0");
        assert_eq!(run(&mut funl, "fib(10)"), "55.0");
        assert_eq!(run(&mut funl, "abs(-7)"), "7.0");
        assert_eq!(run(&mut funl, "abs(3)"), "3.0");
    }

    #[test]
    fn test_locals_and_higher_order() {
        let mut funl = session();
        assert_eq!(run(&mut funl, "hypot2(3, 4)"), "25.0");
        // Called twice: locals from the first call are gone
        assert_eq!(run(&mut funl, "hypot2(1, 1)"), "2.0");
        assert_eq!(run(&mut funl, "apply(square, 9)"), "81.0");
    }

    #[test]
    fn test_result_is_a_tree() {
        let mut funl = session();
        let result = funl.eval_line("square").unwrap();
        assert_eq!(result, Tree::parse("def(square $seq(x) $seq(*(x x)))").unwrap());
    }

    #[test]
    fn test_runaway_recursion_recovers() {
        let mut funl = Interpreter::with_config(EvalConfig::default().with_max_depth(50));
        funl.define("def down n = down(n - 1) end def one = 1 end").unwrap();

        let err = funl.eval_line("down(0)").unwrap_err();
        assert_eq!(err, FunlError::Runtime(RuntimeError::DepthExceeded { limit: 50 }));
        assert_eq!(funl.evaluator().depth(), 0);
        assert_eq!(funl.eval_line("one()").unwrap().to_string(), "1.0");
    }

    #[test]
    fn test_read_from_scripted_input() {
        let input = LineSource::new("6\n".as_bytes(), Vec::new());
        let mut funl = Interpreter::with_input(EvalConfig::default(), Box::new(input));
        funl.define(PROGRAM).unwrap();

        assert_eq!(run(&mut funl, "fact(read \"n? \")"), "720.0");
    }

    #[test]
    fn test_syntax_error_message() {
        let mut funl = Interpreter::new();
        let err = funl.define("def f x = x +  end").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax Error: no term after '+' or '-', found 'end'"
        );
    }
}
