//! Proof command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use dirhash_merkle::{verify_proof, HashValue, MerkleProof};
use serde::Serialize;

use super::load_tree;

/// Result of proving one value against a folder and an expected root.
#[derive(Debug, Serialize)]
pub struct ProofReport {
    pub value: String,
    pub found: bool,
    pub proof: Option<MerkleProof>,
    pub expected_root: HashValue,
    pub tree_root: HashValue,
    pub valid: bool,
}

/// Build the folder's tree, prove `value` and verify the proof.
///
/// The expected root is parsed before anything else; a malformed root is a
/// hard error. An absent value is a normal outcome with `found = false`.
pub fn run(folder: &Path, value: &str, expected_root: &str) -> Result<ProofReport> {
    let expected = HashValue::from_hex(expected_root)
        .with_context(|| format!("Invalid root hash provided: {}", expected_root))?;
    let tree = load_tree(folder)?;

    let proof = tree.generate_proof(value.as_bytes());
    let valid = proof
        .as_ref()
        .map(|p| verify_proof(value.as_bytes(), p, &expected))
        .unwrap_or(false);

    Ok(ProofReport {
        value: value.to_string(),
        found: proof.is_some(),
        proof,
        expected_root: expected,
        tree_root: tree.root(),
        valid,
    })
}

pub fn handle(folder: &Path, value: &str, expected_root: &str, json: bool) -> Result<()> {
    let report = run(folder, value, expected_root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let Some(proof) = &report.proof else {
        println!("{} No proof found for the given value.", "✗".red().bold());
        return Ok(());
    };

    println!("{} Merkle proof steps:", "→".cyan().bold());
    for step in proof {
        println!(" - {} ({})", step.sibling, step.side);
    }

    let verdict = if report.valid {
        "true".green().bold()
    } else {
        "false".red().bold()
    };
    println!("Proof is valid: {}", verdict);
    Ok(())
}
