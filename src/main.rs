use autousata_forms::cli::commands::{
    App, CardArgs, cmd_bid, cmd_forgot_password, cmd_login, cmd_pay, cmd_payment_status,
};
use autousata_forms::cli::config::{Cli, Commands, load_config, resolve_settings};
use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let settings = resolve_settings(&cli, &config)?;
    let app = App::from_settings(&settings)?;

    let succeeded = match &cli.command {
        Commands::ForgotPassword { email } => cmd_forgot_password(&app, email)?,
        Commands::Login { email, password } => cmd_login(&app, email, password)?,
        Commands::Bid { auction, amount } => {
            cmd_bid(&app, auction, *amount)?;
            true
        }
        Commands::Pay {
            auction,
            default_bid,
            holder,
            number,
            expiry,
            cvc,
        } => {
            let card = CardArgs {
                holder,
                number,
                expiry,
                cvc,
            };
            cmd_pay(&app, auction, *default_bid, &card)?
        }
        Commands::PaymentStatus { auction } => {
            cmd_payment_status(&app, auction)?;
            true
        }
    };

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}
