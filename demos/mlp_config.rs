use hierarchiconf::{AppContext, Conf, Setting, Value};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Activation {
    Relu,
    Tanh,
    Sigmoid,
}

/// Stand-in for a parameter initializer supplied by the application.
#[derive(Debug)]
#[allow(dead_code)]
struct Uniform {
    width: f64,
}

fn defaults() -> Result<Conf, hierarchiconf::ConfigError> {
    Conf::new([(
        "//",
        Setting::from(Conf::new([
            ("seed", Setting::from(1234)),
            ("W.*/init_fun", Setting::from(Value::handle(Uniform { width: 1e-2 }))),
            ("W.*/init_width", Setting::from(1e-2)),
            ("use_bias", Setting::from(true)),
            ("activation", Setting::from("relu")),
            ("meta", Setting::from(Conf::new([("reload", Setting::from(true))])?)),
        ])?),
    )])
}

fn main() -> Result<(), hierarchiconf::Error> {
    let run = Conf::builder()
        .with_file("demos/mlp.toml", true)
        .with_env("MLP_DEMO", "__")
        .build()?;

    let ctx = AppContext::builder()
        .with_base(defaults()?)
        .with_config(run)
        .build()?;

    let model = ctx.component("model")?;
    let layers: Vec<usize> = model.get_as("layers")?;
    println!("model {} with layers {:?}", model.get("location")?, layers);

    for i in 0..layers.len() {
        let layer = model.subconf(format!("layer_{i}"))?;
        let weights = layer.subconf("W")?;
        let init = weights.get("init_fun")?;
        let width = weights.get("init_width")?.as_float().unwrap_or_default();
        let activation: Activation = layer.get_as("activation")?;
        println!(
            "  {}: init {:?} width {} activation {:?} use_bias {} seed {}",
            weights.get("location")?,
            init.downcast_ref::<Uniform>(),
            width,
            activation,
            layer.get("use_bias")?,
            layer.get("seed")?,
        );
    }

    let trainer = ctx.component("trainer")?;
    println!(
        "trainer: {} epochs, lrate {}, reload {}",
        trainer.get("num_epochs")?,
        trainer.get("lrate")?,
        trainer.get("meta/reload")?,
    );

    let data = ctx.component("train_data")?;
    println!("batch size {}, mode {}", data.get_or("bs", 10)?, data.get_or("mode", "uniform")?);

    println!("\nentries visible below model/layer_1:\n{}", model.subconf("layer_1")?);
    Ok(())
}
