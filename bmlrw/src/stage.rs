/// A stage in the processing of program terms.
///
/// This is useful to omit certain parts of term processing.
/// Omitting one stage also omits all stages after it,
/// i.e. all stages greater than the stage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Rewriting
    Rewrite,
    /// Printing
    Print,
}

impl core::str::FromStr for Stage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rewrite" => Ok(Self::Rewrite),
            "print" => Ok(Self::Print),
            _ => Err("unknown stage: ".to_owned() + s),
        }
    }
}

#[test]
fn stages() {
    assert_eq!("rewrite".parse(), Ok(Stage::Rewrite));
    assert_eq!("print".parse(), Ok(Stage::Print));
    assert!("parse".parse::<Stage>().is_err());
    assert!(Stage::Rewrite < Stage::Print);
}
