// ==========================================
// S&OP 预测录入系统 - 命令行入口
// ==========================================
// 用法:
//   sop-forecast [--db <path>] <command> [args...]
//
// 命令:
//   products
//   table <produto>
//   set-cell <produto> <ano> <id_tipo> <mes> <valor> [actor]
//   set-total <produto> <ano> <id_tipo> <total> [actor]
//   log <produto> [limit]
//   register <username> <nome> <password>
//   login <username> <password>
// ==========================================

use anyhow::{anyhow, bail, Context};
use sop_forecast::api::{
    ApiError, ForecastTable, LoginRequest, Notification, RegisterRequest, SetCellRequest,
    SetTotalRequest,
};
use sop_forecast::app::{get_default_db_path, AppState};
use sop_forecast::{i18n, logging};

const USAGE: &str = "usage: sop-forecast [--db <path>] <products|table|set-cell|set-total|log|register|login> [args...]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    if let Ok(locale) = std::env::var("SOP_FORECAST_LOCALE") {
        i18n::set_locale(locale.trim());
    }

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let db_path = match args.iter().position(|a| a == "--db") {
        Some(idx) => {
            if idx + 1 >= args.len() {
                bail!("--db requires a path");
            }
            let path = args.remove(idx + 1);
            args.remove(idx);
            path
        }
        None => get_default_db_path(),
    };

    tracing::info!("{} v{}", sop_forecast::APP_NAME, sop_forecast::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).await.map_err(|e| anyhow!(e))?;

    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    match run(&state, command, rest).await {
        Ok(()) => Ok(()),
        Err(CliError::Api(e)) => {
            print_notification(&e.notification());
            Err(e.into())
        }
        Err(CliError::Usage(e)) => Err(e),
    }
}

enum CliError {
    Api(ApiError),
    Usage(anyhow::Error),
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        CliError::Api(e)
    }
}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::Usage(e)
    }
}

fn arg<'a>(rest: &'a [String], idx: usize, name: &str) -> anyhow::Result<&'a str> {
    rest.get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument <{}>\n{}", name, USAGE))
}

fn int_arg(rest: &[String], idx: usize, name: &str) -> anyhow::Result<i32> {
    arg(rest, idx, name)?
        .trim()
        .parse::<i32>()
        .with_context(|| format!("<{}> must be an integer", name))
}

async fn run(state: &AppState, command: &str, rest: &[String]) -> Result<(), CliError> {
    let api = &state.forecast_api;

    match command {
        "products" => {
            for p in api.list_products()? {
                println!("{}\t{}", p.codigo, p.descricao);
            }
        }
        "table" => {
            let table = api.get_forecast_table(arg(rest, 0, "produto")?).await?;
            print_table(&table);
        }
        "set-cell" => {
            let resp = api
                .set_cell(SetCellRequest {
                    produto: arg(rest, 0, "produto")?.to_string(),
                    ano: int_arg(rest, 1, "ano")?,
                    id_tipo: int_arg(rest, 2, "id_tipo")?,
                    mes: arg(rest, 3, "mes")?.to_string(),
                    raw_value: arg(rest, 4, "valor")?.to_string(),
                    actor: rest.get(5).cloned(),
                })
                .await?;
            print_notification(&resp.notification);
            println!(
                "{:?} -> {}  (total {})",
                resp.commit.valor_anterior, resp.commit.valor_novo, resp.row.total
            );
        }
        "set-total" => {
            let resp = api
                .set_total(SetTotalRequest {
                    produto: arg(rest, 0, "produto")?.to_string(),
                    ano: int_arg(rest, 1, "ano")?,
                    id_tipo: int_arg(rest, 2, "id_tipo")?,
                    raw_total: arg(rest, 3, "total")?.to_string(),
                    actor: rest.get(4).cloned(),
                })
                .await?;
            print_notification(&resp.notification);
            let cells: Vec<String> = resp
                .row
                .cells
                .iter()
                .map(|c| format!("{}={}", c.mes, c.valor))
                .collect();
            println!("{}  total={}", cells.join(" "), resp.row.total);
        }
        "log" => {
            let limit = rest.get(1).and_then(|s| s.trim().parse::<usize>().ok());
            for entry in api.list_logs_by_product(arg(rest, 0, "produto")?, limit)? {
                println!("{}\t{}\t{}", entry.log_ts, entry.origem, entry.summary_text());
            }
        }
        "register" => {
            let user = state
                .auth_api
                .register_user(&RegisterRequest {
                    username: arg(rest, 0, "username")?.to_string(),
                    nome: arg(rest, 1, "nome")?.to_string(),
                    password: arg(rest, 2, "password")?.to_string(),
                })
                .await?;
            println!("registered {}", user.username);
        }
        "login" => {
            let user = state.auth_api.login(&LoginRequest {
                username: arg(rest, 0, "username")?.to_string(),
                password: arg(rest, 1, "password")?.to_string(),
            })?;
            println!("ok {} ({})", user.username, user.nome);
        }
        other => return Err(anyhow!("unknown command: {}\n{}", other, USAGE).into()),
    }
    Ok(())
}

fn print_notification(n: &Notification) {
    println!("[{:?}] {}", n.level, n.message);
}

fn print_table(table: &ForecastTable) {
    println!("produto {}", table.produto);
    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| {
                if c.realizado {
                    format!("{}*", c.valor)
                } else {
                    c.valor.to_string()
                }
            })
            .collect();
        println!(
            "{} {:>3} {:<12}{} | {} | total {}",
            row.group.ano,
            row.group.id_tipo,
            row.group.tipo,
            if row.editable { " (edit)" } else { "" },
            cells.join(" "),
            row.total
        );
    }
}
