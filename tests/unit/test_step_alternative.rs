use ductus::core::{
    process, Pipeline, PipelineEntry, PipelineError, Step, StepAlternative, StepError, Values,
};
use std::cell::RefCell;
use std::rc::Rc;

type Seen = Rc<RefCell<Vec<Values<String>>>>;

/// Step that records every input it sees and then either tags the values or fails.
struct Probe {
    name: &'static str,
    fail: bool,
    seen: Seen,
}

impl Probe {
    fn ok(name: &'static str) -> (Self, Seen) {
        Self::build(name, false)
    }

    fn failing(name: &'static str) -> (Self, Seen) {
        Self::build(name, true)
    }

    fn build(name: &'static str, fail: bool) -> (Self, Seen) {
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                name,
                fail,
                seen: seen.clone(),
            },
            seen,
        )
    }
}

impl Step<String> for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, values: &Values<String>) -> Result<Values<String>, PipelineError> {
        self.seen.borrow_mut().push(values.clone());
        if self.fail {
            let first = values.iter().next().cloned().unwrap_or_default();
            return Err(StepError::new(self.name, first).into());
        }
        values.try_map_ref(|value| Ok(format!("{}:{}", self.name, value)))
    }
}

fn doc() -> Values<String> {
    Values::single("<doc/>".to_string())
}

#[test]
fn test_main_success_skips_fallback() {
    let (main, main_seen) = Probe::ok("main");
    let (fallback, fallback_seen) = Probe::ok("fallback");
    let alternative = StepAlternative::new(main, fallback);

    let output = alternative.apply(&doc()).unwrap();

    assert_eq!(output, Values::single("main:<doc/>".to_string()));
    assert_eq!(main_seen.borrow().len(), 1);
    assert!(fallback_seen.borrow().is_empty());
}

#[test]
fn test_fallback_receives_original_input() {
    let (main, main_seen) = Probe::failing("main");
    let (fallback, fallback_seen) = Probe::ok("fallback");
    let alternative = StepAlternative::new(main, fallback);

    let output = alternative.apply(&doc()).unwrap();

    assert_eq!(output, Values::single("fallback:<doc/>".to_string()));
    assert_eq!(main_seen.borrow().len(), 1);
    assert_eq!(*fallback_seen.borrow(), vec![doc()]);
}

#[test]
fn test_double_failure_names_fallback() {
    let (main, _) = Probe::failing("main");
    let (fallback, fallback_seen) = Probe::failing("fallback");
    let entries = vec![PipelineEntry::alternative(main, fallback)];

    let err = process(doc(), &entries).unwrap_err();

    assert_eq!(err.step_name(), "fallback");
    assert!(err.to_string().contains("'fallback'"));
    assert_eq!(fallback_seen.borrow().len(), 1);
}

#[test]
fn test_alternative_in_the_middle_of_a_pipeline() {
    let (before, _) = Probe::ok("before");
    let (main, _) = Probe::failing("main");
    let (fallback, fallback_seen) = Probe::ok("fallback");
    let (after, _) = Probe::ok("after");

    let pipeline = Pipeline::builder()
        .step(before)
        .alternative(main, fallback)
        .step(after)
        .build();

    let output = pipeline.run(doc()).unwrap();

    assert_eq!(
        output,
        Values::single("after:fallback:before:<doc/>".to_string())
    );
    assert_eq!(
        *fallback_seen.borrow(),
        vec![Values::single("before:<doc/>".to_string())]
    );
}

#[test]
fn test_nested_fallback_chain() {
    let (first, _) = Probe::failing("first");
    let (second, second_seen) = Probe::failing("second");
    let (third, third_seen) = Probe::ok("third");

    let alternative =
        StepAlternative::with_nested_fallback(first, StepAlternative::new(second, third));
    let entry = PipelineEntry::from(alternative);
    assert_eq!(entry.label(), "first|second|third");

    let output = process(doc(), &[entry]).unwrap();

    assert_eq!(output, Values::single("third:<doc/>".to_string()));
    assert_eq!(*second_seen.borrow(), vec![doc()]);
    assert_eq!(*third_seen.borrow(), vec![doc()]);
}

#[test]
fn test_alternative_preserves_sequence_shape() {
    let (main, _) = Probe::failing("main");
    let (fallback, _) = Probe::ok("fallback");
    let alternative = StepAlternative::new(main, fallback);

    let input = Values::sequence(vec!["<a/>".to_string(), "<b/>".to_string()]);
    let output = alternative.apply(&input).unwrap();

    assert_eq!(
        output.into_vec(),
        vec!["fallback:<a/>".to_string(), "fallback:<b/>".to_string()]
    );
}
