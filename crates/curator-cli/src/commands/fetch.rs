//! Fetch command - ingest, clean and store one provider indicator.

use curator::{FetchParams, PipelineRequest};

use super::{ConfigFiles, build_curator, print_summary};

/// Arguments of `curator fetch`.
pub struct FetchArgs {
    pub source: String,
    pub indicator: Option<String>,
    pub dataset: Option<String>,
    pub countries: Vec<String>,
    pub start: Option<i32>,
    pub end: Option<i32>,
    pub topic: String,
    pub coverage: String,
}

impl FetchArgs {
    fn params(&self) -> FetchParams {
        let mut params = FetchParams {
            indicator: self.indicator.clone(),
            ..FetchParams::default()
        };
        if let Some(dataset) = &self.dataset {
            params = params.with_dataset(dataset.clone());
        }
        params
            .with_countries(self.countries.iter().cloned())
            .with_years(self.start, self.end)
    }
}

pub fn run(files: &ConfigFiles, args: FetchArgs, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let curator = build_curator(files)?;
    let request = PipelineRequest::new(&args.source, args.params(), &args.topic, &args.coverage);
    let summary = curator.run(&request)?;
    print_summary(&summary, json_output)
}
