use anyhow::Result;

use tabflow::config::ModelConfig;
use tabflow::io::{parse_column_list, read_csv};
use tabflow::preprocessing::ScalingMode;
use tabflow::session::PipelineSession;
use tabflow::split::SplitConfig;

const DATA: &str = "\
sepal_len,sepal_wid,notes,species
5.1,3.5,a,setosa
4.9,3.0,b,setosa
4.7,3.2,c,setosa
4.6,3.1,d,setosa
7.0,3.2,e,versicolor
6.4,3.2,f,versicolor
6.9,3.1,g,versicolor
5.5,2.3,h,versicolor
6.3,3.3,i,virginica
5.8,2.7,j,virginica
7.1,3.0,k,virginica
6.5,3.0,l,virginica
";

fn main() -> Result<()> {
    env_logger::init();

    // Upload and prune.
    let mut dataset = read_csv(DATA)?;
    dataset.remove_columns(&parse_column_list("notes"))?;
    println!("columns: {:?}", dataset.column_names());

    // Train and evaluate.
    let session = PipelineSession::fit(
        dataset,
        "species",
        &ModelConfig::default(),
        &SplitConfig {
            test_fraction: 0.25,
            seed: 5,
        },
        ScalingMode::MinMax,
    )?;
    println!("accuracy: {:.2}%", session.accuracy().unwrap_or(0.0));

    // Predict a new raw row, re-using the fitted scaling and encoding.
    let label = session.predict_request("6.4, 3.1")?;
    println!("predicted: {}", label);

    // Persist the self-consistent triple and restore it.
    let artifact = session.to_artifact();
    let restored = PipelineSession::from_artifact(artifact);
    println!("restored prediction: {}", restored.predict_request("5.0, 3.4")?);

    Ok(())
}
