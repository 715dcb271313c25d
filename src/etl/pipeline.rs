//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::{Result, WrapErr};

/// ETL Pipeline that orchestrates Extract, Transform, and Load operations
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Output)
/// - `L`: Loader type (must load T::Output)
///
/// The pipeline is a single sequential pass. A failing stage aborts the run
/// before any later stage starts, so nothing is loaded on error.
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Output>,
    L: Loader<Input = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract from source
    /// 2. Transform
    /// 3. Load to destination
    ///
    /// Returns the number of rows loaded
    ///
    /// # Errors
    /// Returns an error if any stage fails
    pub fn run(&self) -> Result<usize> {
        log::info!("Starting ETL pipeline");

        log::debug!("Extracting from source...");
        let extracted = self.extractor.extract().wrap_err("Extract stage failed")?;

        log::debug!("Transforming...");
        let transformed = self
            .transformer
            .transform(extracted)
            .wrap_err("Transform stage failed")?;

        log::debug!("Loading to destination...");
        let count = self
            .loader
            .load(transformed)
            .wrap_err("Load stage failed")?;
        log::info!("Loaded {} rows", count);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MockExtractor(Vec<i32>);

    impl Extractor for MockExtractor {
        type Output = Vec<i32>;
        fn extract(&self) -> Result<Self::Output> {
            Ok(self.0.clone())
        }
    }

    struct DoubleTransformer;

    impl Transformer for DoubleTransformer {
        type Input = Vec<i32>;
        type Output = Vec<i32>;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            if input.is_empty() {
                eyre::bail!("nothing to double");
            }
            Ok(input.into_iter().map(|i| i * 2).collect())
        }
    }

    struct SumLoader<'a>(&'a RefCell<i32>);

    impl Loader for SumLoader<'_> {
        type Input = Vec<i32>;
        fn load(&self, input: Self::Input) -> Result<usize> {
            *self.0.borrow_mut() = input.iter().sum();
            Ok(input.len())
        }
    }

    #[test]
    fn test_pipeline() {
        let result = RefCell::new(0);

        let pipeline = Pipeline::new(
            MockExtractor(vec![1, 2, 3]),
            DoubleTransformer,
            SumLoader(&result),
        );

        let count = pipeline.run().unwrap();
        assert_eq!(count, 3);
        assert_eq!(*result.borrow(), 12); // (1+2+3)*2 = 12
    }

    #[test]
    fn test_failed_transform_skips_load() {
        let result = RefCell::new(-1);

        let pipeline = Pipeline::new(MockExtractor(vec![]), DoubleTransformer, SumLoader(&result));

        let err = pipeline.run().unwrap_err();
        assert!(err.to_string().contains("Transform stage failed"));
        assert_eq!(*result.borrow(), -1);
    }
}
