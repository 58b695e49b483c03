use core::fmt::Write as _;

use super::{EvolutionStatistics, Ntbea};

impl EvolutionStatistics {
    /// Write the history as CSV.
    ///
    /// Columns: `gen`, `currentPointFitness`, `bestNeighbourUCB`,
    /// `bestOfSampled`, then one `<L>-tupleCoverage` column per tuple length
    /// in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_csv(&self, mut writer: impl std::io::Write) -> std::io::Result<()> {
        write!(writer, "gen,currentPointFitness,bestNeighbourUCB,bestOfSampled")?;
        for length in self.tuple_lengths() {
            write!(writer, ",{length}-tupleCoverage")?;
        }
        writeln!(writer)?;

        for record in self.records() {
            write!(
                writer,
                "{},{},{},{}",
                record.generation,
                record.current_fitness,
                record.best_neighbour_ucb,
                record.best_of_sampled_value
            )?;
            for length in self.tuple_lengths() {
                match record.coverage.get(length) {
                    Some(coverage) => write!(writer, ",{coverage}")?,
                    None => write!(writer, ",")?,
                }
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the history as CSV to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or written.
    pub fn save_csv(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }

    /// The best-of-sampled point of every generation with its estimate,
    /// one line per generation.
    #[must_use]
    pub fn best_of_sampled_list(&self) -> String {
        let mut s = String::from("Best of Sampled | Mean value estimate \n");
        for record in self.records() {
            let _ = writeln!(
                s,
                "{}:\t{:?}\t->\t{}",
                record.generation, record.best_of_sampled, record.best_of_sampled_value
            );
        }
        s
    }
}

impl Ntbea {
    /// Write the detailed text report: every tuple's pattern statistics,
    /// followed by the best-of-sampled history.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_report(&self, mut writer: impl std::io::Write) -> std::io::Result<()> {
        self.model.write_report(&mut writer)?;
        writer.write_all(self.statistics.best_of_sampled_list().as_bytes())?;
        writer.flush()
    }

    /// Write the detailed text report to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or written.
    pub fn save_report(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_report(std::io::BufWriter::new(file))
    }

    /// Write the per-generation statistics as CSV.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_statistics_csv(&self, writer: impl std::io::Write) -> std::io::Result<()> {
        self.statistics.write_csv(writer)
    }

    /// One-line summary of the run state and current solution.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut s = format!(
            "NTBEA: {} tuples over {} dimensions | {} generations recorded",
            self.model.tuples().len(),
            self.model.search_space().dimensions(),
            self.statistics.len()
        );
        if let Some(solution) = &self.solution {
            let _ = write!(
                s,
                "\nSolution: {:?} -> f = {}",
                solution.point, solution.value
            );
        }
        s
    }
}
