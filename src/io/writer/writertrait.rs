use crate::error::Error;

/// Append-only sentence output.
pub trait SentenceSink {
    fn write_sentence(&mut self, sentence: &str) -> Result<(), Error>;
    fn flush(&mut self) -> Result<(), Error>;
}

/// In-memory sink.
impl SentenceSink for Vec<String> {
    fn write_sentence(&mut self, sentence: &str) -> Result<(), Error> {
        self.push(sentence.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
