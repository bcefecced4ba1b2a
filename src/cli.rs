use crate::block::Workspace;
use crate::generator::GeneratorOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "blockduino-rs",
    about = "Generate an Arduino sketch from a Blockly workspace (JSON serialization)."
)]
pub struct Args {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT", help = "Sketch path. Prints to stdout when omitted.")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Generate zero-based text indices, overriding the workspace setting."
    )]
    pub zero_based_index: bool,

    #[arg(
        long,
        value_name = "N",
        default_value_t = 2,
        help = "Spaces used to indent the loop() body."
    )]
    pub indent: usize,
}

impl Args {
    pub fn generator_options(&self, workspace: &Workspace) -> GeneratorOptions {
        let mut options = GeneratorOptions::for_workspace(workspace);
        if self.zero_based_index {
            options.one_based_index = false;
        }
        options.indent = " ".repeat(self.indent);
        options
    }
}
