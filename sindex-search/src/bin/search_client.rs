//! Interactive search client: derives a trapdoor for each keyword entered
//! on stdin and prints the server's reply. The private key schedule never
//! leaves this process; only trapdoor tags go over the wire.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::path::PathBuf;

use clap::Parser;
use eyre::{bail, Result, WrapErr};
use sindex::codec;
use sindex::prf::{derive_trapdoor, HmacSha256};
use sindex_search::protocol::{self, Reply};

#[derive(Parser, Debug)]
#[command(about = "Interactive keyword search against a secure-index server")]
struct Args {
    /// host:port of the search server
    #[arg(long, env = "SINDEX_SEARCH_SERVER", default_value = "127.0.0.1:7700")]
    server: String,

    /// Private key file holding the hash-key schedule
    #[arg(long, env = "SINDEX_SEARCH_KEYS")]
    keys: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let schedule = codec::read_key_file(&args.keys)
        .wrap_err_with(|| format!("unable to read key file {}", args.keys.display()))?;
    let stream = TcpStream::connect(&args.server)
        .wrap_err_with(|| format!("unable to connect to {}", args.server))?;
    let mut reader = BufReader::new(stream.try_clone().wrap_err("unable to clone connection")?);
    let mut writer = stream;

    println!("Search secure indexes on {}. Enter 'x' to close the session.", args.server);

    let stdin = std::io::stdin();
    loop {
        print!("keyword> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        let eof = stdin.read_line(&mut input)? == 0;
        let keyword = input.trim().to_lowercase();

        if eof || keyword == "x" {
            writeln!(writer, "{}", protocol::encode_request(None))?;
            println!("session closed");
            return Ok(());
        }
        if keyword.is_empty() {
            continue;
        }

        let trapdoor = derive_trapdoor(&HmacSha256, &schedule, &keyword)?;
        writeln!(writer, "{}", protocol::encode_request(Some(&trapdoor)))?;

        let mut reply_line = String::new();
        if reader.read_line(&mut reply_line)? == 0 {
            bail!("server closed the connection");
        }
        match Reply::decode(reply_line.trim_end())? {
            Reply::Ok { checked, matches } => {
                println!("\n Checked the following indexes:");
                println!(" -------------------------------");
                for name in &checked {
                    println!(" -{name}");
                }
                println!("\n Keyword matches found:");
                println!(" ----------------------");
                if matches.is_empty() {
                    println!(" -No matches found.");
                } else {
                    for doc in &matches {
                        println!(" -{doc}");
                    }
                }
                println!();
            }
            Reply::Error { message } => bail!("server rejected the request: {message}"),
        }
    }
}
