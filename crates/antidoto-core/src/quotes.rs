//! Daily quote rotation for the dashboard.

use chrono::NaiveDate;

use crate::calendar::day_of_year;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

/// The fixed quote table. Rotation is by day-of-year, so the set repeats
/// but a given date always shows the same quote.
pub const QUOTES: [Quote; 12] = [
    Quote {
        text: "Não é porque as coisas são difíceis que não ousamos; é porque não ousamos que elas são difíceis.",
        author: "Sêneca",
    },
    Quote {
        text: "A felicidade da sua vida depende da qualidade dos seus pensamentos.",
        author: "Marco Aurélio",
    },
    Quote {
        text: "Primeiro diga a si mesmo o que você quer ser; depois faça o que tem de fazer.",
        author: "Epicteto",
    },
    Quote {
        text: "Tudo vale a pena se a alma não é pequena.",
        author: "Fernando Pessoa",
    },
    Quote {
        text: "O que fazemos repetidamente nos define. A excelência, portanto, não é um ato, mas um hábito.",
        author: "Aristóteles",
    },
    Quote {
        text: "Nenhum vento sopra a favor de quem não sabe para onde ir.",
        author: "Sêneca",
    },
    Quote {
        text: "É no presente, e só nele, que a vida acontece.",
        author: "Marco Aurélio",
    },
    Quote {
        text: "Pedras no caminho? Guardo todas, um dia vou construir um castelo.",
        author: "Fernando Pessoa",
    },
    Quote {
        text: "A disciplina é a ponte entre metas e realizações.",
        author: "Jim Rohn",
    },
    Quote {
        text: "Quem olha para fora, sonha; quem olha para dentro, desperta.",
        author: "Carl Jung",
    },
    Quote {
        text: "A água mole em pedra dura tanto bate até que fura.",
        author: "Provérbio",
    },
    Quote {
        text: "Sorte é o que acontece quando a preparação encontra a oportunidade.",
        author: "Sêneca",
    },
];

/// Quote for a given date: simple daily rotation by day of year.
pub fn quote_of_day(date: NaiveDate) -> &'static Quote {
    let idx = day_of_year(date) as usize % QUOTES.len();
    &QUOTES[idx]
}
