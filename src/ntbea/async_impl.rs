use std::sync::Arc;

use crate::error::Result;
use crate::evaluation::{Evaluator, evaluate_batch_async};

use super::{Ntbea, RunState, Solution};

impl Ntbea {
    /// Async counterpart of [`run`](Self::run).
    ///
    /// Evaluation samples run on the tokio blocking pool, so the runtime stays
    /// responsive for expensive evaluators. Model updates and neighbour
    /// scoring happen on the calling task.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    ///
    /// # Examples
    ///
    /// ```
    /// use ntbea::{Ntbea, SearchSpace};
    ///
    /// # #[cfg(feature = "async")]
    /// # async fn example() -> ntbea::Result<()> {
    /// let space = SearchSpace::new(vec![4, 4, 4])?;
    /// let mut ntbea = Ntbea::builder(space, &[1, 2]).seed(7).build()?;
    /// let solution = ntbea
    ///     .run_async(|p: &[usize]| p.iter().sum::<usize>() as f64, 10)
    ///     .await?;
    /// assert_eq!(solution.point.len(), 3);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_async<E>(&mut self, evaluator: E, generations: usize) -> Result<Solution>
    where
        E: Evaluator + 'static,
    {
        trace_info!(generations, "async run started");

        let evaluator = Arc::new(evaluator);
        let mut current = self.begin(generations)?;

        for generation in 1..=generations {
            self.state = RunState::Running { generation };
            let fitness = match evaluate_batch_async(
                Arc::clone(&evaluator),
                current.clone(),
                self.config.evaluation_samples,
                self.config.evaluation_threads,
                self.config.evaluation_timeout,
            )
            .await
            {
                Ok(stats) => stats.mean(),
                Err(e) => return Err(self.fail(e)),
            };
            current = self.advance(generation, current, fitness);
        }

        self.finish()
    }
}
