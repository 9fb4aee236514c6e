use std::io::Write;

use anyhow::{Result, anyhow, Context};
use clap::Parser as ClapParser;
use kstring::KString;
use htmlfill::{Filler, Decoder, Html5Decoder, TableDecoder, Markup, Props, Value,
               TemplateSource, raw,
               io_util::{my_read_to_string, read_props_file}};


#[derive(clap::Parser, Debug)]
/// Fill an HTML template file with properties, escaping their values
/// unless marked raw, and print the result.
struct Args {
    /// Path to the template file
    #[clap(required(true))]
    template: String,

    /// The file holds serialized markup (e.g. the inner HTML of a
    /// `<template>` element): decode character references before
    /// parsing it
    #[clap(long)]
    markup: bool,

    /// Path to a JSON file holding an object with the properties
    #[clap(long)]
    props: Option<String>,

    /// Set a string property, `name=value`; can be given multiple
    /// times, overrides values from --props
    #[clap(long, multiple_occurrences(true))]
    set: Vec<String>,

    /// Mark the property with this name as raw (trusted HTML); can be
    /// given multiple times
    #[clap(long, multiple_occurrences(true))]
    raw: Vec<String>,

    /// Only decode the character references that escaping produces,
    /// instead of the full HTML5 entity set
    #[clap(long)]
    table_decoder: bool,
}

fn parse_setting(s: &str) -> Result<(KString, Value)> {
    let (k, v) = s.split_once('=').ok_or_else(
        || anyhow!("--set expects name=value, got {s:?}"))?;
    Ok((KString::from_ref(k), Value::from(v)))
}

fn build_props(args: &Args) -> Result<Props> {
    let mut props = if let Some(path) = &args.props {
        read_props_file(path)?
    } else {
        Props::new()
    };
    for setting in &args.set {
        let (k, v) = parse_setting(setting)?;
        props.insert(k, v);
    }
    for name in &args.raw {
        let value = props.get_mut(name).ok_or_else(
            || anyhow!("--raw {name:?}: no such property"))?;
        if !value.is_nullish() {
            *value = raw(KString::from_string(value.to_text().into_owned())).into();
        }
    }
    Ok(props)
}

fn run<D: Decoder>(filler: Filler<D>, args: &Args, props: &Props) -> Result<String> {
    let text = my_read_to_string(&args.template)?;
    let markup;
    let source: TemplateSource = if args.markup {
        markup = Markup::new(text);
        (&markup).into()
    } else {
        text.into()
    };
    filler.fill(source, props).with_context(
        || anyhow!("filling template {:?}", args.template))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let props = build_props(&args)?;
    let out = if args.table_decoder {
        run(Filler::new(TableDecoder), &args, &props)?
    } else {
        run(Filler::new(Html5Decoder), &args, &props)?
    };
    let mut outp = std::io::stdout().lock();
    outp.write_all(out.as_bytes())?;
    outp.flush()?;
    Ok(())
}
