//! 少样本示例
//!
//! WEBTHINK_SIMPLE3 / REFLECTIONS 用于 ReAct 家族；COT / COT_REFLECT 用于 Chain-of-Thought 家族。

/// ReAct 示例：Thought / Action / Observation 交替
pub const WEBTHINK_SIMPLE3: &str = r#"Question: What is the average lifespan of a Giant Sequoia tree in optimal conditions?
Thought 1: I need to search for Giant Sequoia trees and find information about their lifespan.
Action 1: Search[Giant Sequoia lifespan]
Observation 1: Giant sequoias are among the longest living organisms on Earth. In natural conditions, they can live between 1,800 and 2,700 years.
Thought 2: I need to specifically look for their lifespan in optimal conditions.
Action 2: Lookup[optimal conditions Giant Sequoia]
Observation 2: (Result 1 / 1) Under optimal conditions with minimal environmental stress and disease, Giant Sequoias can live up to 3,000 years.
Thought 3: The answer is 3,000 years in optimal conditions.
Action 3: Finish[3,000 years]

Question: Who invented the first successful electric doorbell, and in which year?
Thought 1: I need to search for the history of electric doorbells.
Action 1: Search[electric doorbell inventor]
Observation 1: Joseph Henry invented the electric doorbell in 1831.
Thought 2: Let me verify if this was the first successful one.
Action 2: Search[first successful electric doorbell history]
Observation 2: While earlier attempts existed, Joseph Henry created the first practical and successful electric doorbell in 1831 while working at Albany Academy.
Thought 3: Joseph Henry invented the first successful electric doorbell in 1831.
Action 3: Finish[Joseph Henry, 1831]

Question: Between the Atacama Desert and the Sahara Desert, which receives less annual rainfall?
Thought 1: I need to find the annual rainfall for both deserts and compare them.
Action 1: Search[Atacama Desert rainfall]
Observation 1: The Atacama Desert is the driest nonpolar desert in the world, with an average annual rainfall of less than 1 millimeter (0.04 inches).
Thought 2: Now I need to check the Sahara's rainfall.
Action 2: Search[Sahara Desert annual rainfall]
Observation 2: The Sahara Desert receives an average annual rainfall of about 100 millimeters (4 inches).
Thought 3: The Atacama Desert receives less than 1mm while the Sahara receives about 100mm annually, so the Atacama receives less rainfall.
Action 3: Finish[Atacama Desert]"#;

/// ReAct 反思示例：失败记录 + Reflection
pub const REFLECTIONS: &str = r#"
Previous Trial:
Question: The Rome Protocols were signed by three Prime Ministers one of which was assassinated as part of what?
Thought 1: I need to search Rome Protocols, find the three Prime Ministers, then find what they were assassinated as part of.
Action 1: Search[Rome Protocols]
Observation 1: The Rome Protocols were a series of three international agreements concluded in Rome on 17 March 1934 between the governments of Austria, Hungary and Italy. They were signed by Italian Prime Minister Benito Mussolini, Austrian Chancellor Engelbert Dollfuss and Hungarian Prime Minister Gyula Gömbös. All of the protocols went into effect on 12 July 1934 and were registered in League of Nations Treaty Series on 12 December 1934.
Thought 2: The three Prime Ministers were Benito Mussolini, Engelbert Dollfuss, and Gyula Gömbös. I need to search Benito Mussolini and find what he was assassinated as part of.
Action 2: Search[Benito Mussolini]
Observation 2: Benito Amilcare Andrea Mussolini (UK:  MU(U)SS-ə-LEE-nee, US:  MOOSS-, Italian: [beˈniːto aˈmilkare anˈdrɛːa mussoˈliːni]; 29 July 1883 – 28 April 1945) was an Italian politician and journalist who founded and led the National Fascist Party (PNF) [TRUNCATED] to flee to Switzerland, but both were captured by Italian communist partisans and summarily executed by firing squad on 28 April 1945 near Lake Como. The bodies of Mussolini and his mistress were then taken to Milan, where they were hung upside down at a service station to publicly confirm their demise.
Thought 3: Benito Mussolini was assassinated as part of the collapse of the Axis powers during World War II. So the Rome Protocols were signed by three Prime Ministers one of which was assassinated as part of World War II.
Action 3: Finish[World War II]
<END PREVIOUS ATTEMPT>

Reflection: I searched one of the prime ministers involved in the signing, then attemted to answer right away. I should have searched each of the prime ministers, then looked up 'death' on each of their pages in order to get more information before answering.

Previous Trial:
Question: Kam Heskin plays Paige Morgan in a 2004 film directed by who?
Thought 1: I need to search Kam Heskin and Paige Morgan, find the 2004 film they are in, then find the director of the film.
Action 1: Search[Kam Heskin]
Observation 1: Kam Erika Heskin (born May 8, 1973) is an American actress. She began her career playing Caitlin Deschanel on the NBC daytime soap opera Sunset Beach (1998–1999), before appearing in films Planet of the Apes (2001) and Catch Me If You Can (2002). Heskin went on in 2003 to play Elizabeth Bennet in an independent film Pride & Prejudice: A Latter-Day Comedy, Robin in Charmed (2004),  and Paige Morgan in The Prince and Me film franchise (2006–2010).
Thought 2: Kam Heskin plays Paige Morgan in The Prince and Me film franchise. I need to search The Prince and Me film franchise and find the director of the 2004 film.
Action 2: Search[The Prince and Me film franchise]
Observation 2: Could not find [The Prince and Me film franchise]. Similar: ['Kam Heskin', 'Prince of Persia', 'Harry Potter and the Half-Blood Prince (film)', 'Prince of Persia: The Sands of Time (film)', 'The Chronicles of Narnia (film series)', 'Majestic Prince (franchise)', 'Kingsman (franchise)', 'The Little Prince (2015 film)', 'Shrek (franchise)', 'Harry Potter (film series)']
Thought 3: I need to search The Prince and Me (2004 film) instead.
Action 3: Search[The Prince and Me (2004 film)]
Observation 3: Could not find [The Prince and Me (2004 film)]. Similar: ['The Prince & Me', 'The Prince & Me 2: The Royal Wedding', 'Kam Heskin', 'Prince of Darkness (film)', 'Prince of Persia: The Sands of Time (film)', 'Rob Knox', 'Alexander (2004 film)', 'Prince of Persia', 'Brooklynn Prince', 'Prince (musician)']
Thought 4: I need to search The Prince & Me (2004 film).
Action 4: Search[The Prince & Me (2004 film)]
Observation 4: Could not find [The Prince & Me (2004 film)]. Similar: ['The Prince & Me', 'The Prince & Me 2: The Royal Wedding', 'Prince of Darkness (film)', 'Prince of Persia: The Sands of Time (film)', 'Rob Knox', 'Alexander (2004 film)', 'Prince (musician)', 'Prince of Persia', 'Kam Heskin', 'Brooklynn Prince']
Thought 5: I need to search The Prince & Me (2004 film) instead.
Action 5: Search[The Prince & Me (2004 film)]
Observation 5: Could not find [The Prince & Me (2004 film)]. Similar: ['The Prince & Me', 'The Prince & Me 2: The Royal Wedding', 'Prince of Darkness (film)', 'Prince of Persia: The Sands of Time (film)', 'Rob Knox', 'Alexander (2004 film)', 'Prince (musician)', 'Prince of Persia', 'Kam Heskin', 'Brooklynn Prince']
Thought 6: I need to search The Prince & Me (2004 film).
Action 6: Search[The Prince & Me (2004 film)]
Observation 6: Could not find [The Prince & Me (2004 film)]. Similar: ['The Prince & Me', 'The Prince & Me 2: The Royal Wedding', 'Prince of Darkness (film)', 'Prince of Persia: The Sands of Time (film)', 'Rob Knox', 'Alexander (2004 film)', 'Prince (musician)', 'Prince of Persia', 'Kam Heskin', 'Brooklynn Prince']

Reflection: I got stuck in a loop where I kept trying to search 'The Prince & Me (2004 film)' but the page could not be found. Instead I should have tried to search the similar results that had a similar name to see and they were made in 2004.
"#;

/// CoT 示例：根据相关上下文思考后直接 Finish
pub const COT: &str = r#"Relevant Context: The Nile River is the longest river in Africa. It flows north for about 6,650 kilometres and empties into the Mediterranean Sea. Its drainage basin covers eleven countries, including Egypt and Sudan.
Question: Into which sea does the longest river in Africa empty?
Thought: The longest river in Africa is the Nile, and the context says it empties into the Mediterranean Sea.
Action: Finish[Mediterranean Sea]

Relevant Context: Marie Curie was a Polish and naturalised-French physicist and chemist. She was the first woman to win a Nobel Prize and the only person to win Nobel Prizes in two scientific fields, physics (1903) and chemistry (1911).
Question: In which year did the first woman to win a Nobel Prize win her chemistry prize?
Thought: The first woman to win a Nobel Prize is Marie Curie. She won the chemistry prize in 1911.
Action: Finish[1911]

Relevant Context: The Eiffel Tower was designed by the engineering company of Gustave Eiffel and completed in 1889 for the World's Fair in Paris. Gustave Eiffel also designed the internal frame of the Statue of Liberty.
Question: The company that designed the Eiffel Tower also designed the frame of which American monument?
Thought: The Eiffel Tower was designed by Gustave Eiffel's company, which also designed the internal frame of the Statue of Liberty.
Action: Finish[Statue of Liberty]"#;

/// CoT 反思示例
pub const COT_REFLECT: &str = r#"
Relevant Context: Ernest Hemingway's novel The Old Man and the Sea was published in 1952. It won the Pulitzer Prize for Fiction in 1953, and Hemingway was awarded the Nobel Prize in Literature in 1954.
Question: In which year did the author of The Old Man and the Sea win the Pulitzer Prize for that novel?
Thought: The Old Man and the Sea was published in 1952, so it won the prize that year.
Action: Finish[1952]

Reflection: I confused the publication year with the award year. The context states that the novel won the Pulitzer Prize in 1953. Next time I should read which event each date in the context refers to before answering.

Relevant Context: The Amazon River in South America is the largest river by discharge volume of water in the world. The Nile is generally regarded as the longest river.
Question: Which river is the largest in the world by discharge volume?
Thought: The Nile is the longest river in the world, so it is the largest.
Action: Finish[Nile]

Reflection: I treated "longest" and "largest by discharge" as the same property. The context clearly names the Amazon as the largest by discharge volume. I should match the exact property asked in the question against the context.
"#;
