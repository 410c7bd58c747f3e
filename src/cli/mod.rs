pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recipebox")]
#[command(about = "RecipeBox - Browse, search and save recipes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Search recipes
    Search {
        /// Search query
        query: String,

        /// Diet filter (e.g. vegetarian, vegan)
        #[arg(long)]
        diet: Option<String>,

        /// Cuisine filter
        #[arg(long)]
        cuisine: Option<String>,

        /// Maximum ready time in minutes
        #[arg(long)]
        max_time: Option<u32>,

        /// Number of result pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },

    /// Show a batch of random recipes
    Random {
        /// How many recipes
        #[arg(short, long, default_value_t = 6)]
        count: usize,
    },

    /// Show full details of one recipe
    Show {
        /// Recipe ID
        id: String,
    },

    /// Autocomplete recipe titles
    Suggest {
        /// Partial query, at least 2 characters
        query: String,
    },

    /// Sign in and remember the user in local storage
    Login {
        email: String,
        password: String,
    },
}
