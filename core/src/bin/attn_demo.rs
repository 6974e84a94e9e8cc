use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use attn_rs::config::{AttentionConfig, BatchConfig};
use attn_rs::data::{TextDataset, Tokenizer};
use attn_rs::nn::{Module, SelfAttention, TokenEmbedding};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLE_CORPUS: &str =
    "这里的山路十八弯，这里的水路九连环。没有比人更高的山，没有比脚更长的路。";

fn main() {
    if let Err(err) = run() {
        eprintln!("attn-demo failed: {:#}", err);
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Causal self-attention over a character corpus", long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Corpus file (defaults to a built-in sample)"
    )]
    text: Option<PathBuf>,

    #[arg(long, help = "Model width [env: ATTN_D_MODEL, default 64]")]
    d_model: Option<usize>,

    #[arg(long, help = "Sequences per batch [env: ATTN_BATCH_SIZE, default 2]")]
    batch_size: Option<usize>,

    #[arg(long, help = "Context window length [env: ATTN_BLOCK_SIZE, default 4]")]
    block_size: Option<usize>,

    #[arg(long, help = "RNG seed [env: ATTN_SEED, default 123]")]
    seed: Option<u64>,

    #[arg(
        long,
        value_name = "TEXT",
        help = "Also show the special-token encoding of this text"
    )]
    encode: Option<String>,
}

fn run() -> Result<()> {
    let args = Args::parse();

    let mut attn_config = AttentionConfig::default();
    attn_config
        .apply_env_overrides()
        .context("Invalid attention settings in environment")?;
    let mut batch_config = BatchConfig::default();
    batch_config
        .apply_env_overrides()
        .context("Invalid batch settings in environment")?;

    if let Some(d_model) = args.d_model {
        attn_config.d_model = d_model;
    }
    if let Some(batch_size) = args.batch_size {
        batch_config.batch_size = batch_size;
    }
    if let Some(block_size) = args.block_size {
        batch_config.block_size = block_size;
    }
    if let Some(seed) = args.seed {
        batch_config.seed = seed;
    }
    attn_config
        .validate()
        .context("Invalid attention configuration")?;
    batch_config
        .validate()
        .context("Invalid batch configuration")?;

    let (dataset, corpus) = load_corpus(args.text.as_deref())?;
    println!(
        "corpus: {} tokens, vocab size {}",
        dataset.len(),
        dataset.vocab_size()
    );

    let mut rng = StdRng::seed_from_u64(batch_config.seed);
    let batch = dataset
        .get_batch(batch_config.batch_size, batch_config.block_size, &mut rng)
        .with_context(|| {
            format!(
                "Failed to sample a {}x{} batch",
                batch_config.batch_size, batch_config.block_size
            )
        })?;
    for (i, (x, y)) in batch.iter().enumerate() {
        println!(
            "batch[{i}] input={:?} {:?} -> target={:?} {:?}",
            dataset.decode(x),
            x,
            dataset.decode(y),
            y
        );
    }

    let embedding = TokenEmbedding::new(dataset.vocab_size(), attn_config.d_model, &mut rng)
        .context("Failed to initialize token embedding")?;
    let attn = SelfAttention::from_config(&attn_config, &mut rng)
        .context("Failed to initialize self-attention")?;
    println!(
        "parameters: embedding={} attention={}",
        embedding.num_parameters(),
        attn.num_parameters()
    );

    let x = embedding
        .forward(&batch.inputs[0])
        .context("Failed to embed input sequence")?;
    let (out, weights) = attn
        .forward_with_weights(&x)
        .context("Attention forward pass failed")?;
    println!("attention weights {:?}:\n{}", weights.shape(), weights);
    println!("output shape: {:?}", out.shape());

    if let Some(text) = &args.encode {
        let tokenizer = Tokenizer::new(&corpus);
        let ids = tokenizer.encode(text, batch_config.block_size + 2);
        println!("encode({text:?}) = {ids:?} -> {:?}", tokenizer.decode(&ids));
    }

    Ok(())
}

/// Loads the corpus at `path`, or the built-in sample when no path is given.
fn load_corpus(path: Option<&Path>) -> Result<(TextDataset, String)> {
    match path {
        Some(path) => {
            let dataset = TextDataset::from_file(path)
                .with_context(|| format!("Failed to load corpus from {}", path.display()))?;
            let corpus = dataset.decode(dataset.data());
            Ok((dataset, corpus))
        }
        None => {
            let dataset =
                TextDataset::from_text(SAMPLE_CORPUS).context("Failed to build sample dataset")?;
            Ok((dataset, SAMPLE_CORPUS.to_string()))
        }
    }
}
